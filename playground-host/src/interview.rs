//! Interview mode: an isolation host plus a timed session for one challenge.

use crate::clock::SessionClock;
use crate::config::HostConfig;
use crate::error::HostResult;
use crate::host::IsolationHost;
use crate::session::SessionSnapshot;
use crate::surface::Surface;
use dashmap::DashMap;
use playground_sandbox::{Challenge, SandboxProfile, Synthesizer};

pub struct InterviewSession<S: Surface> {
    host: IsolationHost<S>,
    clock: SessionClock,
    challenge: Challenge,
    /// Number of hints revealed beyond the first.
    hints_shown: usize,
    auto_run: bool,
}

/// Open interview sessions keyed by tab id.
pub type SessionStore<S> = DashMap<String, InterviewSession<S>>;

pub fn new_session_store<S: Surface>() -> SessionStore<S> {
    DashMap::new()
}

impl<S: Surface> InterviewSession<S> {
    /// Opens a session on `challenge`. Runs the starter code when auto-run is enabled.
    pub fn open(challenge: Challenge, surface: S, config: &HostConfig) -> HostResult<Self> {
        let host = IsolationHost::new(
            surface,
            Synthesizer::new(config.assets.clone()),
            SandboxProfile::Interview,
            challenge.default_bundle(),
        )
        .with_settle(config.run_settle);
        let clock = SessionClock::new(challenge.limit_seconds())?;

        let mut session = Self {
            host,
            clock,
            challenge,
            hints_shown: 0,
            auto_run: config.auto_run,
        };
        tracing::info!(challenge = %session.challenge.id, "interview session opened");
        if session.auto_run {
            session.host.run_current()?;
        }
        Ok(session)
    }

    pub fn host(&self) -> &IsolationHost<S> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut IsolationHost<S> {
        &mut self.host
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// Switches exercise. Code, stylesheet, log, hint counter and timer all reset
    /// to the new challenge's defaults; unsaved edits are discarded.
    pub fn select_exercise(&mut self, challenge: Challenge) -> HostResult<SessionSnapshot> {
        let snapshot = self.clock.reset(challenge.limit_seconds())?;
        self.host.replace_defaults(challenge.default_bundle());
        self.hints_shown = 0;
        tracing::info!(from = %self.challenge.id, to = %challenge.id, "exercise changed");
        self.challenge = challenge;
        if self.auto_run {
            self.host.run_current()?;
        }
        Ok(snapshot)
    }

    /// Reveals one more hint, up to the last. Returns the number now visible.
    pub fn reveal_next_hint(&mut self) -> usize {
        if self.hints_shown + 1 < self.challenge.hints.len() {
            self.hints_shown += 1;
        }
        self.visible_hints().len()
    }

    /// The first hint is always visible once hints are opened.
    pub fn visible_hints(&self) -> &[String] {
        let hints = &self.challenge.hints;
        &hints[..(self.hints_shown + 1).min(hints.len())]
    }

    pub fn has_more_hints(&self) -> bool {
        self.hints_shown + 1 < self.challenge.hints.len()
    }

    pub fn requirements(&self) -> &[String] {
        &self.challenge.requirements
    }

    pub fn start(&mut self) -> HostResult<SessionSnapshot> {
        self.clock.start()
    }

    pub fn pause(&mut self) -> HostResult<SessionSnapshot> {
        self.clock.pause()
    }

    pub fn resume(&mut self) -> HostResult<SessionSnapshot> {
        self.clock.resume()
    }

    pub fn submit(&mut self) -> HostResult<SessionSnapshot> {
        self.clock.submit()
    }
}
