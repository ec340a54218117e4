//! # Edit Session
//!
//! Host-facing state for one editor window: the current document, the edits
//! collected from the preview since the last sync, and the element selected
//! for the style controls.
//!
//! ```text
//! preview ──TEXT_EDIT──▶ record() ──▶ EditBuffer
//!                                         │ sync()
//!                                         ▼
//!            push() ◀── SourceDocument ◀── apply_batch
//! ```

use loupe_parser::ElementAddress;
use tracing::{info, warn};

use crate::buffer::EditBuffer;
use crate::config::EditorConfig;
use crate::document::SourceDocument;
use crate::edits::{Color, HeadingPreset, PendingEdit, StyleEdit};
use crate::engine::{SkippedEdit, SourceEditEngine};
use crate::errors::{EditError, EditorError};

pub const MIN_FONT_SIZE_PX: f64 = 8.0;
pub const MAX_FONT_SIZE_PX: f64 = 72.0;

/// Where rendered source goes. Implemented by the preview bridge.
pub trait PreviewPort {
    /// Fire-and-forget; failures are the port's to report.
    fn push(&mut self, revision: u64, source: &str);
}

/// Values of the style controls, applied to the selected element
#[derive(Debug, Clone, PartialEq)]
pub struct StyleControls {
    pub background_color: Color,
    pub text_color: Color,
    pub font_size_px: f64,
    pub bold: bool,
}

impl Default for StyleControls {
    fn default() -> Self {
        Self {
            background_color: Color::white(),
            text_color: Color::black(),
            font_size_px: 16.0,
            bold: false,
        }
    }
}

impl StyleControls {
    fn to_edit(&self, address: ElementAddress) -> StyleEdit {
        StyleEdit::new(
            address,
            self.background_color.clone(),
            self.text_color.clone(),
            self.font_size_px.clamp(MIN_FONT_SIZE_PX, MAX_FONT_SIZE_PX),
            self.bold,
        )
    }
}

/// What a sync did
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Document revision after the sync
    pub revision: u64,
    pub applied: Vec<PendingEdit>,
    pub skipped: Vec<SkippedEdit>,
    /// Whether the new source was pushed to the preview
    pub pushed: bool,
}

pub struct EditSession {
    config: EditorConfig,
    engine: SourceEditEngine,
    document: SourceDocument,
    buffer: EditBuffer,
    selection: Option<ElementAddress>,
    controls: StyleControls,
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        let engine = SourceEditEngine::new(config.dialect);
        let document = SourceDocument::new(config.initial_source.clone());
        Self {
            config,
            engine,
            document,
            buffer: EditBuffer::new(),
            selection: None,
            controls: StyleControls::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn engine(&self) -> &SourceEditEngine {
        &self.engine
    }

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    pub fn source(&self) -> &str {
        self.document.text()
    }

    pub fn revision(&self) -> u64 {
        self.document.revision()
    }

    /// The user replaced the source text. Clears the selection.
    pub fn set_source(&mut self, text: impl Into<String>) {
        let document = std::mem::replace(&mut self.document, SourceDocument::new(String::new()));
        self.document = document.replace_text(text);
        self.selection = None;
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.buffer
    }

    /// Record an edit reported by the preview or built by the controls
    pub fn record(&mut self, edit: PendingEdit) {
        self.buffer.record(edit);
    }

    pub fn can_sync(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Drop pending edits without applying them
    pub fn discard_pending(&mut self) -> usize {
        self.buffer.discard()
    }

    /// Select an element of the current source for the style controls.
    pub fn select(&mut self, address: ElementAddress) -> Result<(), EditorError> {
        if !self.engine.enumerate(self.source())?.contains(&address) {
            return Err(EditError::NotFound(address).into());
        }
        self.selection = Some(address);
        Ok(())
    }

    pub fn selection(&self) -> Option<&ElementAddress> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn controls(&self) -> &StyleControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut StyleControls {
        &mut self.controls
    }

    /// Record the current controls as a style edit for the selection.
    pub fn apply_style(&mut self) -> Result<StyleEdit, EditorError> {
        let address = self.selection.clone().ok_or(EditorError::NoSelection)?;
        let edit = self.controls.to_edit(address);
        edit.style_expression()?;
        self.buffer.record(edit.clone().into());
        Ok(edit)
    }

    /// Turn the selection into a heading: rename and resize.
    pub fn apply_heading(&mut self, preset: HeadingPreset) -> Result<StyleEdit, EditorError> {
        let address = self.selection.clone().ok_or(EditorError::NoSelection)?;
        self.controls.font_size_px = preset.font_size_px();
        let edit = self.controls.to_edit(address).with_target_tag(preset.tag());
        self.buffer.record(edit.clone().into());
        Ok(edit)
    }

    /// Send the current source to the preview.
    pub fn update_preview(&self, port: &mut impl PreviewPort) {
        info!(revision = self.revision(), bytes = self.source().len(), "pushing source to preview");
        port.push(self.revision(), self.source());
    }

    /// Apply every pending edit to the source, then re-render.
    ///
    /// Edits that fail on their own are skipped and listed in the report.
    /// If the source itself does not parse nothing is applied and the edits
    /// go back into the buffer.
    pub fn sync(&mut self, port: &mut impl PreviewPort) -> Result<SyncReport, EditorError> {
        if self.buffer.is_empty() {
            return Err(EditorError::NothingToSync);
        }

        let edits = self.buffer.drain();
        let document = std::mem::replace(&mut self.document, SourceDocument::new(String::new()));

        let (document, outcome) = match document.apply_batch(&self.engine, &edits) {
            Ok(result) => result,
            Err((document, err)) => {
                warn!(error = %err, pending = edits.len(), "sync aborted, keeping edits");
                self.document = document;
                self.buffer.restore(edits);
                return Err(err.into());
            }
        };

        self.document = document;
        self.selection = None;

        info!(
            revision = self.revision(),
            applied = outcome.applied.len(),
            skipped = outcome.skipped.len(),
            "synced preview edits into source"
        );

        let pushed = self.config.push_on_sync;
        if pushed {
            self.update_preview(port);
        }

        Ok(SyncReport {
            revision: self.revision(),
            applied: outcome.applied,
            skipped: outcome.skipped,
            pushed,
        })
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
