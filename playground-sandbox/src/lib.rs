//! # Playground Sandbox
//!
//! Builds the self-contained documents that run user-authored component code
//! inside an isolated iframe, and defines the messages that document relays back
//! to the host page.
//!
//! ## Features
//! - Pure, deterministic document synthesis (no execution host-side)
//! - Console relay shim installed before any user code runs
//! - Guarded transpile-and-execute wrapper: user errors become console errors
//! - Cross-context message schema with forward-compatible parsing
//! - Sandbox attribute profiles for the embedding iframe
//! - Interview challenge catalog with lookup, filtering and search
//!
//! ## Example
//! ```
//! use playground_sandbox::{synthesize, MOUNT_ELEMENT_ID};
//!
//! let doc = synthesize(
//!     "ReactDOM.createRoot(document.getElementById('app')).render(<h1>Hi</h1>);",
//!     "h1 { color: tomato; }",
//! );
//! assert!(doc.as_str().contains(&format!("<div id=\"{}\"></div>", MOUNT_ELEMENT_ID)));
//! ```

pub mod bundle;
pub mod catalog;
pub mod clock;
pub mod document;
pub mod error;
pub mod message;
pub mod policy;
pub mod shim;

// --- Core types ---
pub use bundle::{SourceBundle, SynthesizedDocument};
pub use document::{RuntimeAssets, Synthesizer, BASE_STYLES, MOUNT_ELEMENT_ID};
pub use error::{SandboxError, SandboxResult};
pub use message::{ConsoleLevel, ConsoleMessage, Inbound, LogKind, RelayMessage, CONSOLE_MESSAGE_TYPE};
pub use policy::SandboxProfile;

// --- Catalog types ---
pub use catalog::{Catalog, Category, Challenge, Difficulty};

/// Synthesize a document from component and style source using the default runtime assets.
///
/// Pure string assembly: nothing is executed and nothing can fail here.
pub fn synthesize(component_source: &str, style_source: &str) -> SynthesizedDocument {
    Synthesizer::default().synthesize(&SourceBundle {
        component_source: component_source.to_string(),
        style_source: style_source.to_string(),
    })
}
