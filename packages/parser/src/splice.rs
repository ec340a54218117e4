//! Span-preserving source regeneration.
//!
//! Edits are expressed as byte-range replacements against the text that was
//! parsed. Every byte outside a patch is copied through untouched, so
//! regeneration never reformats unrelated code.

use thiserror::Error;

/// Replace `source[start..end]` with `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Patch {start}..{end} is outside the source ({len} bytes)")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Patch {start}..{end} splits a character")]
    NotCharBoundary { start: usize, end: usize },

    #[error("Patch at {start} overlaps a previous patch ending at {previous_end}")]
    Overlapping { start: usize, previous_end: usize },
}

impl SourcePatch {
    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    fn delta(&self) -> isize {
        self.text.len() as isize - (self.end - self.start) as isize
    }
}

/// Apply non-overlapping patches to `source`.
///
/// Patches may be given in any order. Inserts at the same offset keep the
/// order they were given in.
pub fn apply_patches(source: &str, patches: &[SourcePatch]) -> Result<String, PatchError> {
    let mut ordered: Vec<&SourcePatch> = patches.iter().collect();
    ordered.sort_by_key(|patch| (patch.start, patch.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for patch in ordered {
        if patch.start > patch.end || patch.end > source.len() {
            return Err(PatchError::OutOfBounds {
                start: patch.start,
                end: patch.end,
                len: source.len(),
            });
        }
        if !source.is_char_boundary(patch.start) || !source.is_char_boundary(patch.end) {
            return Err(PatchError::NotCharBoundary {
                start: patch.start,
                end: patch.end,
            });
        }
        if patch.start < cursor {
            return Err(PatchError::Overlapping {
                start: patch.start,
                previous_end: cursor,
            });
        }

        output.push_str(&source[cursor..patch.start]);
        output.push_str(&patch.text);
        cursor = patch.end;
    }

    output.push_str(&source[cursor..]);
    Ok(output)
}

/// Follow a byte offset of the original text through applied patches.
///
/// Returns `None` when the offset fell inside a replaced range, i.e. the
/// thing it pointed at no longer exists.
pub fn remap_offset(offset: usize, patches: &[SourcePatch]) -> Option<usize> {
    let mut shift: isize = 0;

    for patch in patches {
        if patch.start < patch.end && patch.start <= offset && offset < patch.end {
            return None;
        }
        if patch.end <= offset {
            shift += patch.delta();
        }
    }

    Some((offset as isize + shift) as usize)
}
