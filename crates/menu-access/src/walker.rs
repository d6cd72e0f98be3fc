//! Positional visibility index shared by the two resolution phases.
//!
//! Phase A records decisions against a counter that advances once per
//! resolvable (non-`url`) item. Phase B walks the generated tree depth-first,
//! pre-order, advancing its own counter by the same rule, and applies the
//! recorded decisions by position. Both walks must see the same tree shape in
//! the same order; a mismatch is not detected and yields wrong hides.

use std::collections::BTreeSet;

use tracing::debug;

use crate::item::MenuItem;

/// Hide decisions keyed by resolvable-item position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityIndex {
    hidden: BTreeSet<usize>,
    next: usize,
}

impl VisibilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for the next resolvable item.
    ///
    /// Every resolvable item claims a slot, whether or not its target
    /// resolves.
    pub fn next_slot(&mut self) -> usize {
        let slot = self.next;
        self.next += 1;
        slot
    }

    /// Record that the item at `slot` is hidden.
    pub fn record(&mut self, slot: usize) {
        self.hidden.insert(slot);
    }

    pub fn is_hidden(&self, slot: usize) -> bool {
        self.hidden.contains(&slot)
    }

    /// Number of slots claimed so far.
    pub fn slots(&self) -> usize {
        self.next
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

/// Counts from one Phase B walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Every node visited, `url` items included.
    pub visited: usize,
    /// Resolvable nodes, i.e. slots consumed.
    pub slots: usize,
    /// Nodes marked hidden by this walk.
    pub hidden: usize,
}

/// Apply recorded decisions to `items`.
///
/// Only ever sets `hidden`; items the index does not mark are left as they
/// were.
pub fn apply_visibility(
    items: &mut [MenuItem],
    index: &VisibilityIndex,
    mirror_view_bag: bool,
) -> ApplySummary {
    let mut summary = ApplySummary::default();
    apply_level(items, index, mirror_view_bag, &mut summary);

    debug!(
        visited = summary.visited,
        slots = summary.slots,
        recorded_slots = index.slots(),
        hidden = summary.hidden,
        "applied menu visibility"
    );
    summary
}

fn apply_level(
    items: &mut [MenuItem],
    index: &VisibilityIndex,
    mirror_view_bag: bool,
    summary: &mut ApplySummary,
) {
    for item in items {
        summary.visited += 1;

        if item.item_type.is_resolvable() {
            let slot = summary.slots;
            summary.slots += 1;
            if index.is_hidden(slot) {
                item.mark_hidden(mirror_view_bag);
                summary.hidden += 1;
            }
        }

        // Parent is numbered before its descendants, and all descendants
        // before the next sibling.
        apply_level(&mut item.children, index, mirror_view_bag, summary);
    }
}
