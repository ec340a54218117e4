use loupe_parser::Dialect;
use serde::{Deserialize, Serialize};

use crate::errors::EditorError;

/// Starter component shown before the user types anything
pub const DEFAULT_SOURCE: &str = r#"
export default function Component() {
  const [count, setCount] = React.useState(0)
  return (
    <div style={{fontFamily:'sans-serif', padding: 16}}>
      <h1 style={{margin: 0, marginBottom: 12}}>Hello Renderer 👋</h1>
      <p style={{margin: 0, marginBottom: 12}}>A basic React component preview with shareable link.</p>
      <button
        onClick={() => setCount(c => c + 1)}
        style={{
          padding: '8px 12px',
          borderRadius: 8,
          border: '1px solid #e5e7eb',
          background: '#2563eb',
          color: '#fff',
          cursor: 'pointer'
        }}
      >
        Clicked {count} times
      </button>
    </div>
  )
}
"#;

/// Editor session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Source dialect accepted by the parser
    #[serde(default)]
    pub dialect: Dialect,

    /// Source the session starts with
    #[serde(default = "default_initial_source")]
    pub initial_source: String,

    /// Re-push the new source to the preview after a sync
    #[serde(default = "default_push_on_sync")]
    pub push_on_sync: bool,
}

fn default_initial_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_push_on_sync() -> bool {
    true
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.initial_source = source.into();
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            initial_source: default_initial_source(),
            push_on_sync: default_push_on_sync(),
        }
    }
}
