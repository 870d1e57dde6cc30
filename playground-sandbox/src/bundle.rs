use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// User input for one run: component code plus an optional stylesheet.
///
/// Both fields are untrusted and unvalidated. Syntax errors only surface once the
/// isolated document executes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBundle {
    pub component_source: String,
    #[serde(default)]
    pub style_source: String,
}

impl SourceBundle {
    pub fn new(component_source: impl Into<String>) -> Self {
        Self {
            component_source: component_source.into(),
            style_source: String::new(),
        }
    }

    pub fn with_style(mut self, style_source: impl Into<String>) -> Self {
        self.style_source = style_source.into();
        self
    }
}

/// A complete HTML document produced for a single run. Never mutated; the next run
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedDocument {
    html: String,
}

impl SynthesizedDocument {
    pub(crate) fn new(html: String) -> Self {
        Self { html }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// Hex SHA-256 of the document text.
    pub fn digest(&self) -> String {
        format!("{:x}", Sha256::digest(self.html.as_bytes()))
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

impl AsRef<str> for SynthesizedDocument {
    fn as_ref(&self) -> &str {
        &self.html
    }
}
