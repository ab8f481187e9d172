//! Progress callbacks emitted while walking a hierarchy.

use rollup_shared::{CompletionSummary, Item};

/// Receives one callback per traversal event. `depth` is 0 for the root.
///
/// Implementations decide how much to show; they never influence counts or
/// closure decisions.
pub trait TraversalObserver: Send + Sync {
    /// An item was fetched and is about to be processed.
    fn visited(&self, depth: usize, item: &Item);
    /// The item is already closed; its subtree is skipped.
    fn already_closed(&self, depth: usize, item: &Item);
    /// The item has no children and is left alone.
    fn no_children(&self, depth: usize, item: &Item);
    /// Completion before descending into the children.
    fn progress(&self, depth: usize, item: &Item, summary: &CompletionSummary);
    /// All children are complete. `preview` is true when nothing is mutated.
    fn closing(&self, depth: usize, item: &Item, preview: bool);
    /// Some children are still open after the walk.
    fn keeping_open(&self, depth: usize, item: &Item, summary: &CompletionSummary);
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl TraversalObserver for SilentObserver {
    fn visited(&self, _depth: usize, _item: &Item) {}
    fn already_closed(&self, _depth: usize, _item: &Item) {}
    fn no_children(&self, _depth: usize, _item: &Item) {}
    fn progress(&self, _depth: usize, _item: &Item, _summary: &CompletionSummary) {}
    fn closing(&self, _depth: usize, _item: &Item, _preview: bool) {}
    fn keeping_open(&self, _depth: usize, _item: &Item, _summary: &CompletionSummary) {}
}
