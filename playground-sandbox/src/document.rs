//! Document Synthesizer: turns a [`SourceBundle`] into a self-contained HTML document
//! for an isolated iframe `srcdoc`. Execution only happens inside that document.

use crate::bundle::{SourceBundle, SynthesizedDocument};
use crate::shim::shim_script;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::OnceLock;

/// Identifier of the single mount element user code renders into.
pub const MOUNT_ELEMENT_ID: &str = "app";

/// Base reset and typography, emitted before the user stylesheet.
pub const BASE_STYLES: &str = "* { box-sizing: border-box; margin: 0; padding: 0; }\n\
body { font-family: system-ui, sans-serif; background: linear-gradient(135deg, #0f0f1a, #1a1a2e); color: white; min-height: 100vh; padding: 1rem; }";

const DEFAULT_REACT_URL: &str = "https://unpkg.com/react@18/umd/react.development.js";
const DEFAULT_REACT_DOM_URL: &str = "https://unpkg.com/react-dom@18/umd/react-dom.development.js";
const DEFAULT_BABEL_URL: &str = "https://unpkg.com/@babel/standalone/babel.min.js";

/// Scripts that give the isolated document rendering and transpilation capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeAssets {
    pub react_url: String,
    pub react_dom_url: String,
    pub babel_url: String,
}

impl Default for RuntimeAssets {
    fn default() -> Self {
        Self {
            react_url: DEFAULT_REACT_URL.to_string(),
            react_dom_url: DEFAULT_REACT_DOM_URL.to_string(),
            babel_url: DEFAULT_BABEL_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    assets: RuntimeAssets,
}

impl Synthesizer {
    pub fn new(assets: RuntimeAssets) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &RuntimeAssets {
        &self.assets
    }

    /// Builds the document. Order: asset scripts, base styles, user styles, mount
    /// element, console shim, guarded user code.
    ///
    /// The user stylesheet is inserted as is, except that `</style` is written as
    /// `<\/style` (CSS reads `\/` as `/`). The component source never appears
    /// as markup: it is embedded as an escaped string literal and transpiled at run
    /// time, so it cannot close the script element early.
    pub fn synthesize(&self, bundle: &SourceBundle) -> SynthesizedDocument {
        let mut html = String::with_capacity(
            2048 + bundle.component_source.len() + bundle.style_source.len(),
        );

        // Writing into a String cannot fail.
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<script src="{react}"></script>
<script src="{react_dom}"></script>
<script src="{babel}"></script>
<style>
{base}
{user_css}
</style>
</head>
<body>
<div id="{mount}"></div>
{shim}
{guard}
</body>
</html>
"#,
            react = escape_attr(&self.assets.react_url),
            react_dom = escape_attr(&self.assets.react_dom_url),
            babel = escape_attr(&self.assets.babel_url),
            base = BASE_STYLES,
            user_css = style_text(&bundle.style_source),
            mount = MOUNT_ELEMENT_ID,
            shim = shim_script(),
            guard = guard_script(&bundle.component_source),
        );

        SynthesizedDocument::new(html)
    }
}

/// Transpile-and-execute wrapper. A throw at any stage becomes one console.error.
fn guard_script(component_source: &str) -> String {
    format!(
        r#"<script>
(function(){{
  var source = {source};
  try {{
    var compiled = Babel.transform(source, {{ presets: ['react'] }}).code;
    new Function(compiled)();
  }} catch (e) {{
    console.error(e && e.message ? e.message : String(e));
  }}
}})();
</script>"#,
        source = script_string_literal(component_source)
    )
}

/// Encodes text as a JavaScript string literal that is safe inside a script element.
fn script_string_literal(text: &str) -> String {
    // serde_json never fails on a plain &str.
    let json = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

static STYLE_CLOSE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Keeps user CSS inside its style element: any `</style` (any case) gets its
/// slash escaped.
fn style_text(css: &str) -> std::borrow::Cow<'_, str> {
    let re = STYLE_CLOSE_REGEX.get_or_init(|| Regex::new(r"(?i)</(style)").unwrap());
    re.replace_all(css, |caps: &Captures| format!("<\\/{}", &caps[1]))
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
