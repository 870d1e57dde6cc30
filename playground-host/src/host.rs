//! Isolation Host: owns a surface, resynthesizes on every run and keeps the ordered
//! log of messages relayed back from the isolated document.

use crate::error::HostResult;
use crate::log::{ConsoleLog, LogEntry};
use crate::surface::Surface;
use playground_sandbox::{
    Inbound, RelayMessage, SandboxProfile, SourceBundle, SynthesizedDocument, Synthesizer,
};
use serde_json::Value;
use std::time::{Duration, Instant};

pub struct IsolationHost<S: Surface> {
    surface: S,
    synthesizer: Synthesizer,
    profile: SandboxProfile,
    defaults: SourceBundle,
    bundle: SourceBundle,
    log: ConsoleLog,
    document: Option<SynthesizedDocument>,
    /// Incremented by every run.
    generation: u64,
    started_at: Option<Instant>,
    settle: Duration,
}

impl<S: Surface> IsolationHost<S> {
    pub fn new(
        surface: S,
        synthesizer: Synthesizer,
        profile: SandboxProfile,
        defaults: SourceBundle,
    ) -> Self {
        Self {
            surface,
            synthesizer,
            profile,
            bundle: defaults.clone(),
            defaults,
            log: ConsoleLog::new(),
            document: None,
            generation: 0,
            started_at: None,
            settle: Duration::ZERO,
        }
    }

    /// How long [`is_busy`](Self::is_busy) reports true after a run starts.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn bundle(&self) -> &SourceBundle {
        &self.bundle
    }

    pub fn defaults(&self) -> &SourceBundle {
        &self.defaults
    }

    pub fn set_component_source(&mut self, source: impl Into<String>) {
        self.bundle.component_source = source.into();
    }

    pub fn set_style_source(&mut self, source: impl Into<String>) {
        self.bundle.style_source = source.into();
    }

    /// Clears the log, synthesizes a fresh document and loads it into the surface.
    /// Always a full reload; an earlier run's document is simply superseded.
    pub fn run(&mut self, bundle: SourceBundle) -> HostResult<()> {
        self.bundle = bundle;
        self.run_current()
    }

    pub fn run_current(&mut self) -> HostResult<()> {
        self.log.clear();
        let document = self.synthesizer.synthesize(&self.bundle);
        self.generation += 1;
        self.started_at = Some(Instant::now());

        tracing::debug!(
            generation = self.generation,
            bytes = document.len(),
            digest = %document.digest(),
            profile = self.profile.attribute(),
            "loading synthesized document"
        );

        let loaded = self.surface.load(&document, self.profile);
        self.document = Some(document);
        loaded
    }

    /// Restores the default bundle, then runs it.
    pub fn reset(&mut self) -> HostResult<()> {
        self.bundle = self.defaults.clone();
        self.run_current()
    }

    /// Switches to new defaults (exercise change). Edits, log and the current
    /// document are discarded; nothing is run.
    pub fn replace_defaults(&mut self, defaults: SourceBundle) {
        self.bundle = defaults.clone();
        self.defaults = defaults;
        self.log.clear();
        self.document = None;
        self.started_at = None;
    }

    /// Handles one cross-context message. Only `console` messages affect the log.
    pub fn on_message(&mut self, message: &Value) -> Option<&LogEntry> {
        match RelayMessage::from_value(message) {
            Inbound::Console(msg) => Some(self.log.push(msg)),
            Inbound::Ignored => {
                tracing::trace!("ignoring non-console message");
                None
            }
            Inbound::Malformed(reason) => {
                tracing::warn!(%reason, "dropping malformed console message");
                None
            }
        }
    }

    pub fn on_raw_message(&mut self, raw: &str) -> Option<&LogEntry> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.on_message(&value),
            Err(_) => None,
        }
    }

    pub fn log(&self) -> &ConsoleLog {
        &self.log
    }

    pub fn document(&self) -> Option<&SynthesizedDocument> {
        self.document.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn profile(&self) -> SandboxProfile {
        self.profile
    }

    /// True while the most recent run is within its settle window.
    pub fn is_busy(&self, now: Instant) -> bool {
        match self.started_at {
            Some(started) => now.saturating_duration_since(started) < self.settle,
            None => false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
