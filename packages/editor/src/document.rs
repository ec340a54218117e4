//! # Source Document
//!
//! The authoritative component source. A document never caches a tree;
//! each structural operation re-parses the text through the engine.
//!
//! Documents are values: applying edits consumes the document and yields the
//! next one, so there is never more than one current source.

use crate::edits::PendingEdit;
use crate::engine::{BatchOutcome, SourceEditEngine};
use crate::errors::EditError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    text: String,
    /// Increments whenever the text changes
    revision: u64,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the text wholesale, e.g. after typing in the source pane.
    pub fn replace_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text == self.text {
            return self;
        }
        Self {
            text,
            revision: self.revision + 1,
        }
    }

    /// Apply one edit. The original is handed back alongside the error.
    pub fn apply_edit(
        self,
        engine: &SourceEditEngine,
        edit: &PendingEdit,
    ) -> Result<Self, (Self, EditError)> {
        match engine.apply_edit(&self.text, edit) {
            Ok(text) => Ok(self.replace_text(text)),
            Err(err) => Err((self, err)),
        }
    }

    /// Apply a batch best-effort; see [`SourceEditEngine::apply_batch`].
    pub fn apply_batch(
        self,
        engine: &SourceEditEngine,
        edits: &[PendingEdit],
    ) -> Result<(Self, BatchOutcome), (Self, EditError)> {
        match engine.apply_batch(&self.text, edits) {
            Ok(outcome) => {
                let next = self.replace_text(outcome.source.clone());
                Ok((next, outcome))
            }
            Err(err) => Err((self, err)),
        }
    }
}
