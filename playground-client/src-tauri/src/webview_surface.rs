//! Surface backed by the main webview: the document is handed to the frontend,
//! which assigns it to a sandboxed iframe `srcdoc`. Nothing runs in this process.

use playground_host::{HostError, HostResult, Surface};
use playground_sandbox::{SandboxProfile, SynthesizedDocument};
use tauri::{AppHandle, Emitter};

pub const LOAD_EVENT: &str = "playground://load";

#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPayload {
    pub tab_id: String,
    pub html: String,
    /// Value for the iframe `sandbox` attribute.
    pub sandbox: &'static str,
    pub digest: String,
}

pub struct WebviewSurface {
    app: AppHandle,
    tab_id: String,
}

impl WebviewSurface {
    pub fn new(app: AppHandle, tab_id: String) -> Self {
        Self { app, tab_id }
    }
}

impl Surface for WebviewSurface {
    fn load(&mut self, document: &SynthesizedDocument, profile: SandboxProfile) -> HostResult<()> {
        let payload = LoadPayload {
            tab_id: self.tab_id.clone(),
            html: document.as_str().to_string(),
            sandbox: profile.attribute(),
            digest: document.digest(),
        };
        self.app
            .emit(LOAD_EVENT, payload)
            .map_err(|e| HostError::SurfaceLoad(e.to_string()))
    }
}
