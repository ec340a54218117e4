//! Error types for the editor

use loupe_parser::{ElementAddress, ParseError, PatchError};
use thiserror::Error;

/// Failure of a single edit against a source text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Element not found: {0}")]
    NotFound(ElementAddress),

    #[error("Invalid tag name: {0:?}")]
    InvalidTag(String),

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Patch error: {0}")]
    Patch(#[from] PatchError),
}

impl EditError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditError::NotFound(_))
    }

    /// The underlying parse failure, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            EditError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Session-level failures surfaced to the host UI.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Nothing to sync: no pending edits")]
    NothingToSync,

    #[error("No element selected")]
    NoSelection,

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
