//! Interview Session State Machine.
//!
//! `ready -> running -> {paused <-> running, completed, timed-out}`. Completed and
//! timed-out are terminal until [`Session::reset`].

use crate::error::{HostError, HostResult};
use playground_sandbox::clock::{format_clock, is_time_low, time_percent};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Ready,
    Running,
    Paused,
    Completed,
    TimedOut,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::TimedOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Ready => "ready",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
            SessionState::TimedOut => "timed-out",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-initiated transitions. Timeout and exercise change are not actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Start,
    Pause,
    Resume,
    Submit,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionAction::Start => "start",
            SessionAction::Pause => "pause",
            SessionAction::Resume => "resume",
            SessionAction::Submit => "submit",
        })
    }
}

pub fn allowed_actions(from: SessionState) -> Vec<SessionAction> {
    use SessionAction::*;
    match from {
        SessionState::Ready => vec![Start],
        SessionState::Running => vec![Pause, Submit],
        SessionState::Paused => vec![Resume],
        SessionState::Completed | SessionState::TimedOut => vec![],
    }
}

fn target(action: SessionAction) -> SessionState {
    match action {
        SessionAction::Start | SessionAction::Resume => SessionState::Running,
        SessionAction::Pause => SessionState::Paused,
        SessionAction::Submit => SessionState::Completed,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    remaining_seconds: u32,
    limit_seconds: u32,
}

/// Serializable view for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub remaining_seconds: u32,
    pub limit_seconds: u32,
    /// `MM:SS`
    pub clock: String,
    pub percent: f64,
    pub time_low: bool,
}

impl Session {
    pub fn new(limit_seconds: u32) -> HostResult<Self> {
        if limit_seconds == 0 {
            return Err(HostError::InvalidTimeLimit);
        }
        Ok(Self {
            state: SessionState::Ready,
            remaining_seconds: limit_seconds,
            limit_seconds,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn limit_seconds(&self) -> u32 {
        self.limit_seconds
    }

    pub fn apply(&mut self, action: SessionAction) -> HostResult<()> {
        if !allowed_actions(self.state).contains(&action) {
            return Err(HostError::IllegalTransition {
                from: self.state,
                action,
            });
        }
        let from = self.state;
        self.state = target(action);
        tracing::info!(%from, to = %self.state, remaining = self.remaining_seconds, "session transition");
        Ok(())
    }

    pub fn start(&mut self) -> HostResult<()> {
        self.apply(SessionAction::Start)
    }

    pub fn pause(&mut self) -> HostResult<()> {
        self.apply(SessionAction::Pause)
    }

    pub fn resume(&mut self) -> HostResult<()> {
        self.apply(SessionAction::Resume)
    }

    pub fn submit(&mut self) -> HostResult<()> {
        self.apply(SessionAction::Submit)
    }

    /// One elapsed second. Only counts while running; reaching zero forces timed-out.
    pub fn tick(&mut self) -> SessionState {
        if self.state != SessionState::Running {
            return self.state;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = SessionState::TimedOut;
            tracing::info!(limit = self.limit_seconds, "session timed out");
        }
        self.state
    }

    /// Back to ready with a full clock (exercise change or explicit reset).
    pub fn reset(&mut self, limit_seconds: u32) -> HostResult<()> {
        *self = Self::new(limit_seconds)?;
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            remaining_seconds: self.remaining_seconds,
            limit_seconds: self.limit_seconds,
            clock: format_clock(self.remaining_seconds),
            percent: time_percent(self.remaining_seconds, self.limit_seconds),
            time_low: is_time_low(self.remaining_seconds, self.limit_seconds),
        }
    }
}
