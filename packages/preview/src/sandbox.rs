//! The page loaded into the preview sandbox.
//!
//! It renders pushed source, tags every element below the mount root with
//! `data-loupe-tag` / `data-loupe-index` (same walk as [`crate::dom`]), makes
//! leaf elements editable and reports back with [`crate::protocol`] messages.

use serde::{Deserialize, Serialize};

const TEMPLATE: &str = include_str!("sandbox.html");

/// Script sources and mount point for the sandbox page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SandboxOptions {
    pub react_src: String,
    pub react_dom_src: String,
    /// In-page transpiler (Babel standalone)
    pub babel_src: String,
    pub mount_id: String,
}

impl Default for SandboxOptions {
    fn default() -> Self {
        Self {
            react_src: "https://unpkg.com/react@18/umd/react.development.js".to_string(),
            react_dom_src: "https://unpkg.com/react-dom@18/umd/react-dom.development.js".to_string(),
            babel_src: "https://unpkg.com/@babel/standalone/babel.min.js".to_string(),
            mount_id: "root".to_string(),
        }
    }
}

impl SandboxOptions {
    pub fn render(&self) -> String {
        TEMPLATE
            .replace("__REACT_SRC__", &escape_attribute(&self.react_src))
            .replace("__REACT_DOM_SRC__", &escape_attribute(&self.react_dom_src))
            .replace("__BABEL_SRC__", &escape_attribute(&self.babel_src))
            .replace("__MOUNT_ID_JSON__", &script_string(&self.mount_id))
            .replace("__MOUNT_ID__", &escape_attribute(&self.mount_id))
    }
}

/// The sandbox page with default script sources
pub fn sandbox_document() -> String {
    SandboxOptions::default().render()
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// JS string literal that cannot close the surrounding `<script>`
fn script_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}
