//! # Loupe Editor
//!
//! Writes edits made in a rendered preview back into component source.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: JSX text → element sites           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: pending edits → source patches      │
//! │  - EditBuffer collects edits between syncs  │
//! │  - SourceEditEngine splices them into text  │
//! │  - EditSession drives sync and re-render    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ preview: sandbox render + edit messages     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Source text is the truth**: the preview is always re-derived from it
//! 2. **Minimal diffs**: only the edited byte ranges change
//! 3. **Best-effort sync**: one bad edit never blocks the others
//!
//! ## Usage
//!
//! ```rust,ignore
//! use loupe_editor::{EditSession, EditorConfig, ElementAddress, TextEdit};
//!
//! let mut session = EditSession::new(EditorConfig::default().with_source("<p>Hello</p>"));
//! session.record(TextEdit::new(ElementAddress::new("p", 0), "Hi").into());
//!
//! let report = session.sync(&mut preview)?;
//! assert_eq!(session.source(), "<p>Hi</p>");
//! ```

pub mod buffer;
pub mod config;
pub mod document;
pub mod edits;
pub mod engine;
pub mod errors;
pub mod session;

pub use buffer::EditBuffer;
pub use config::{EditorConfig, DEFAULT_SOURCE};
pub use document::SourceDocument;
pub use edits::{Color, HeadingPreset, PendingEdit, StyleEdit, TextEdit};
pub use engine::{BatchOutcome, SkippedEdit, SourceEditEngine};
pub use errors::{EditError, EditorError};
pub use session::{EditSession, PreviewPort, StyleControls, SyncReport, MAX_FONT_SIZE_PX, MIN_FONT_SIZE_PX};

pub use loupe_parser::{Dialect, ElementAddress};
