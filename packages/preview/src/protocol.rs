//! Messages exchanged with the sandbox.
//!
//! Everything crossing the boundary is JSON tagged by `type`:
//!
//! ```text
//! editor  ──PUSH { revision, source }──────────────▶ sandbox
//! editor ◀──TEXT_EDIT { tag, index, text }────────── sandbox
//! editor ◀──RENDERED { revision }─────────────────── sandbox
//! editor ◀──ERROR { phase, message, revision }────── sandbox
//! ```

use std::fmt;

use loupe_editor::{PendingEdit, TextEdit};
use loupe_parser::ElementAddress;
use serde::{Deserialize, Serialize};

/// Source sent to the sandbox for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushFrame {
    pub revision: u64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    Push(PushFrame),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// Text of a rendered element changed
    TextEdit { tag: String, index: u32, text: String },

    /// A push compiled and rendered
    Rendered {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revision: Option<u64>,
    },

    Error {
        phase: ErrorPhase,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revision: Option<u64>,
    },
}

impl InboundMessage {
    /// Revision of the push this message answers, if it says
    pub fn revision(&self) -> Option<u64> {
        match self {
            InboundMessage::TextEdit { .. } => None,
            InboundMessage::Rendered { revision } | InboundMessage::Error { revision, .. } => *revision,
        }
    }

    pub fn into_edit(self) -> Option<PendingEdit> {
        match self {
            InboundMessage::TextEdit { tag, index, text } => {
                Some(TextEdit::new(ElementAddress::new(&tag, index), text).into())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPhase {
    /// The transpiler rejected the source
    Compile,
    /// The component threw while rendering
    Runtime,
    /// The push never reached the sandbox
    Transport,
}

impl fmt::Display for ErrorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorPhase::Compile => "compile",
            ErrorPhase::Runtime => "runtime",
            ErrorPhase::Transport => "transport",
        })
    }
}

/// Why the preview is not showing the current source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewError {
    pub phase: ErrorPhase,
    pub message: String,
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.phase, self.message)
    }
}

/// Outcome of the latest push, as reported by the sandbox
pub type CompileResult = Result<(), PreviewError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_frame_json() {
        let message = OutboundMessage::Push(PushFrame {
            revision: 3,
            source: "<p>Hi</p>".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "type": "PUSH", "revision": 3, "source": "<p>Hi</p>" })
        );
    }

    #[test]
    fn test_inbound_shapes() {
        let edit: InboundMessage =
            serde_json::from_str(r#"{"type":"TEXT_EDIT","tag":"P","index":1,"text":"Hi"}"#).unwrap();
        assert_eq!(edit.revision(), None);
        let pending = edit.into_edit().unwrap();
        assert_eq!(pending.address(), &ElementAddress::new("p", 1));

        let rendered: InboundMessage = serde_json::from_str(r#"{"type":"RENDERED"}"#).unwrap();
        assert_eq!(rendered, InboundMessage::Rendered { revision: None });

        let error: InboundMessage = serde_json::from_str(
            r#"{"type":"ERROR","phase":"runtime","message":"boom","revision":2}"#,
        )
        .unwrap();
        assert_eq!(error.revision(), Some(2));
        assert!(error.into_edit().is_none());
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"SCROLL","y":4}"#).is_err());
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"TEXT_EDIT","tag":"p"}"#).is_err());
    }

    #[test]
    fn test_preview_error_display() {
        let error = PreviewError {
            phase: ErrorPhase::Compile,
            message: "Unexpected token".to_string(),
        };
        assert_eq!(error.to_string(), "compile error: Unexpected token");
    }
}
