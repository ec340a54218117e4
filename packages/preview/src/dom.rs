//! Rendered-side addressing.
//!
//! A [`RenderedNode`] tree mirrors what the sandbox mounted. The mount root
//! itself is not addressed; every element below it is, in pre-order, with
//! the same counter the parser uses for source. The sandbox script
//! implements the same walk in the page.

use loupe_parser::{ElementAddress, OccurrenceCounter};
use serde::{Deserialize, Serialize};

pub const TAG_ATTRIBUTE: &str = "data-loupe-tag";
pub const INDEX_ATTRIBUTE: &str = "data-loupe-index";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    /// Element name as the DOM reports it (`DIV`, `p`, ...)
    pub tag: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<RenderedNode>,
    /// Set by [`instrument`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<ElementAddress>,
    #[serde(default)]
    pub editable: bool,
}

impl RenderedNode {
    pub fn element(tag: &str, children: Vec<RenderedNode>) -> Self {
        Self {
            tag: tag.to_string(),
            children,
            ..Self::default()
        }
    }

    pub fn leaf(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First node below this one carrying `address`
    pub fn find(&self, address: &ElementAddress) -> Option<&RenderedNode> {
        self.children.iter().find_map(|child| {
            if child.address.as_ref() == Some(address) {
                Some(child)
            } else {
                child.find(address)
            }
        })
    }
}

/// Addresses of every element below `root`, pre-order
pub fn enumerate_rendered(root: &RenderedNode) -> Vec<ElementAddress> {
    let mut counter = OccurrenceCounter::new();
    let mut addresses = Vec::new();
    walk(&root.children, &mut |node| addresses.push(counter.next_address(&node.tag)));
    addresses
}

fn walk(nodes: &[RenderedNode], visit: &mut impl FnMut(&RenderedNode)) {
    for node in nodes {
        visit(node);
        walk(&node.children, visit);
    }
}

/// Tag every element below `root` with its address and mark leaves editable.
/// Returns the number of elements tagged.
pub fn instrument(root: &mut RenderedNode) -> usize {
    let mut counter = OccurrenceCounter::new();
    let mut tagged = 0;
    instrument_children(&mut root.children, &mut counter, &mut tagged);
    tagged
}

fn instrument_children(nodes: &mut [RenderedNode], counter: &mut OccurrenceCounter, tagged: &mut usize) {
    for node in nodes {
        node.address = Some(counter.next_address(&node.tag));
        node.editable = node.is_leaf();
        *tagged += 1;
        instrument_children(&mut node.children, counter, tagged);
    }
}
