//! Pending edits between syncs.
//!
//! At most one edit is kept per address, whatever its kind. A later edit for
//! the same address replaces the earlier one but keeps its place in the
//! queue.

use loupe_parser::ElementAddress;
use tracing::debug;

use crate::edits::PendingEdit;

#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    pending: Vec<PendingEdit>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit, returning the one it replaced.
    pub fn record(&mut self, edit: PendingEdit) -> Option<PendingEdit> {
        match self.position(&edit) {
            Some(position) => {
                debug!(address = %edit.address(), "replacing pending edit");
                Some(std::mem::replace(&mut self.pending[position], edit))
            }
            None => {
                debug!(address = %edit.address(), pending = self.pending.len() + 1, "recorded edit");
                self.pending.push(edit);
                None
            }
        }
    }

    /// Take every pending edit in first-recorded order.
    pub fn drain(&mut self) -> Vec<PendingEdit> {
        std::mem::take(&mut self.pending)
    }

    /// Drop every pending edit, returning how many were dropped.
    pub fn discard(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            debug!(dropped, "discarded pending edits");
        }
        dropped
    }

    /// Put drained edits back in front of anything recorded since.
    ///
    /// An edit recorded after the drain wins over a restored edit for the
    /// same address, taking the restored edit's place.
    pub fn restore(&mut self, edits: Vec<PendingEdit>) {
        let mut newer = std::mem::take(&mut self.pending);
        let mut merged = Vec::with_capacity(edits.len() + newer.len());

        for edit in edits {
            if merged.iter().any(|kept: &PendingEdit| same_address(kept, &edit)) {
                continue;
            }
            match newer.iter().position(|recent| same_address(recent, &edit)) {
                Some(position) => merged.push(newer.remove(position)),
                None => merged.push(edit),
            }
        }
        merged.extend(newer);

        self.pending = merged;
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, address: &ElementAddress) -> Option<&PendingEdit> {
        self.pending.iter().find(|edit| edit.address() == address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &ElementAddress> {
        self.pending.iter().map(PendingEdit::address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingEdit> {
        self.pending.iter()
    }

    fn position(&self, edit: &PendingEdit) -> Option<usize> {
        self.pending.iter().position(|pending| same_address(pending, edit))
    }
}

fn same_address(a: &PendingEdit, b: &PendingEdit) -> bool {
    a.address() == b.address()
}
