//! # Element Addressing
//!
//! An element is addressed by `(tag, index)`: its tag name (lowercase) and
//! its 0-based rank among all elements with the same tag name, counted in
//! pre-order document order.
//!
//! ## Population
//!
//! Exactly one population is counted, on both sides of the preview boundary:
//! every *intrinsic* element. In JSX that is an element named by a plain
//! lowercase identifier (`div`, `my-widget`) or a namespaced name
//! (`svg:rect`). Component invocations (`<Card>`, `<ui.Button>`) are not
//! elements of the rendered DOM and are never counted. In the rendered DOM it
//! is every element below the mount root.
//!
//! Elements are counted whether or not they carry visible text.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifies one element instance within a single traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "AddressRepr")]
pub struct ElementAddress {
    tag: String,
    index: u32,
}

#[derive(Deserialize)]
struct AddressRepr {
    tag: String,
    index: u32,
}

impl From<AddressRepr> for ElementAddress {
    fn from(repr: AddressRepr) -> Self {
        ElementAddress::new(&repr.tag, repr.index)
    }
}

impl ElementAddress {
    /// Create an address; the tag name is normalized to lowercase
    pub fn new(tag: &str, index: u32) -> Self {
        Self {
            tag: normalize_tag(tag),
            index,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Case-insensitive tag comparison
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag.trim())
    }
}

impl fmt::Display for ElementAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tag, self.index)
    }
}

pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// Hands out addresses in traversal order.
///
/// Shared by the AST walk and the rendered-tree walk so both sides rank
/// elements with the same rule.
#[derive(Debug, Default, Clone)]
pub struct OccurrenceCounter {
    seen: HashMap<String, u32>,
}

impl OccurrenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address for the next element named `tag` in traversal order
    pub fn next_address(&mut self, tag: &str) -> ElementAddress {
        let tag = normalize_tag(tag);
        let slot = self.seen.entry(tag.clone()).or_insert(0);
        let index = *slot;
        *slot += 1;
        ElementAddress { tag, index }
    }

    /// Number of elements seen so far with this tag
    pub fn count(&self, tag: &str) -> u32 {
        self.seen.get(&normalize_tag(tag)).copied().unwrap_or(0)
    }
}

/// Whether `name` can be used as the new name of an intrinsic element.
///
/// Accepts `h1`, `my-widget`, `svg:rect`; rejects component names
/// (`Card`), member expressions and anything with whitespace or markup.
pub fn is_intrinsic_tag_name(name: &str) -> bool {
    let mut parts = name.split(':');
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            }
            _ => false,
        }
    };

    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, None) => valid_part(name),
        (Some(namespace), Some(name), None) => valid_part(namespace) && valid_part(name),
        _ => false,
    }
}
