//! The isolated rendering surface a host feeds documents into.

use crate::error::HostResult;
use playground_sandbox::{SandboxProfile, SynthesizedDocument};

/// An out-of-realm browsing context (iframe, webview, separate process).
///
/// `load` replaces whatever the surface was showing; the previous realm and any
/// timers it started are torn down. Implementations must never evaluate the
/// document in the host's own context.
pub trait Surface {
    fn load(&mut self, document: &SynthesizedDocument, profile: SandboxProfile) -> HostResult<()>;
}

/// Keeps every loaded document. Used headless and in tests.
#[derive(Debug, Default)]
pub struct MemorySurface {
    history: Vec<(SynthesizedDocument, SandboxProfile)>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&SynthesizedDocument> {
        self.history.last().map(|(doc, _)| doc)
    }

    pub fn current_profile(&self) -> Option<SandboxProfile> {
        self.history.last().map(|(_, profile)| *profile)
    }

    pub fn load_count(&self) -> usize {
        self.history.len()
    }
}

impl Surface for MemorySurface {
    fn load(&mut self, document: &SynthesizedDocument, profile: SandboxProfile) -> HostResult<()> {
        self.history.push((document.clone(), profile));
        Ok(())
    }
}
