//! # Loupe Parser
//!
//! Reads JSX/TSX component source and reports where every addressed element
//! lives in the text, so edits can be spliced back without reformatting.
//!
//! ```text
//! source text ──oxc──▶ AST ──walk──▶ [ElementSite] ──patches──▶ source text'
//! ```
//!
//! See [`address`] for the addressing rule shared with the rendered preview.

pub mod address;
pub mod error;
pub mod parser;
pub mod splice;

pub use address::{is_intrinsic_tag_name, normalize_tag, ElementAddress, OccurrenceCounter};
pub use error::{ParseError, ParseResult};
pub use parser::{enumerate, find_site, parse_sites, AttributeSite, ByteRange, Dialect, ElementSite};
pub use splice::{apply_patches, remap_offset, PatchError, SourcePatch};
