//! Bottom-up completion propagation.
//!
//! Walks an item hierarchy depth-first, one child at a time, and closes every
//! open parent whose children are all complete once its subtree has been
//! processed. Closing a child can complete its parent, so each parent is
//! re-read from the store after its children and only that second read
//! decides whether it closes.

use std::future::Future;
use std::pin::Pin;

use rollup_shared::{
    ChildRef, DEFAULT_CLOSE_NOTE, Item, Reference, Result, RollupError, TraversalResult,
};
use tracing::{debug, info, instrument, warn};

use crate::observer::{SilentObserver, TraversalObserver};
use crate::store::ItemStore;

type VisitFuture<'a> = Pin<Box<dyn Future<Output = Result<Visit>> + Send + 'a>>;

/// What happened to a single node during the walk.
enum Visit {
    /// Fetched and found closed; nothing below it was read.
    AlreadyClosed,
    /// Open and processed, with the counts for its whole subtree.
    Walked(TraversalResult),
}

/// Walk the hierarchy under `reference` with no observer and the default note.
pub async fn propagate(
    store: &dyn ItemStore,
    reference: &Reference,
    depth: usize,
    preview_only: bool,
) -> Result<TraversalResult> {
    Propagator::new(store)
        .propagate(reference, depth, preview_only)
        .await
}

/// Completion propagator bound to a store, an observer, and a close note.
pub struct Propagator<'a> {
    store: &'a dyn ItemStore,
    observer: &'a dyn TraversalObserver,
    note: String,
}

impl<'a> Propagator<'a> {
    pub fn new(store: &'a dyn ItemStore) -> Self {
        Self {
            store,
            observer: &SilentObserver,
            note: DEFAULT_CLOSE_NOTE.to_string(),
        }
    }

    /// Report traversal events to `observer`.
    pub fn with_observer(mut self, observer: &'a dyn TraversalObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Comment text posted after closing an item.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Process the item at `reference` and everything below it.
    ///
    /// With `preview_only`, eligible items are counted but the store is
    /// never mutated. The first unrecoverable store error aborts the walk.
    ///
    /// `depth` is the indentation level reported to the observer for
    /// `reference`; it does not change which items are walked or counted.
    ///
    /// An already-closed `reference` yields zero counts. An already-closed
    /// child still counts as processed, since it was fetched.
    #[instrument(skip_all, fields(root = %reference, depth, preview_only))]
    pub async fn propagate(
        &self,
        reference: &Reference,
        depth: usize,
        preview_only: bool,
    ) -> Result<TraversalResult> {
        let result = match self.visit(reference, depth, preview_only).await? {
            Visit::AlreadyClosed => TraversalResult::default(),
            Visit::Walked(result) => result,
        };
        info!(
            depth,
            processed = result.processed,
            closed = result.closed,
            "propagation finished"
        );
        Ok(result)
    }

    fn visit<'b>(
        &'b self,
        reference: &'b Reference,
        depth: usize,
        preview_only: bool,
    ) -> VisitFuture<'b> {
        Box::pin(async move {
            let item = self.fetch(reference).await?;
            self.observer.visited(depth, &item);

            if item.is_closed() {
                debug!(item = %reference, "already closed, skipping subtree");
                self.observer.already_closed(depth, &item);
                return Ok(Visit::AlreadyClosed);
            }

            let Some(summary) = item.children_summary().copied() else {
                self.observer.no_children(depth, &item);
                return Ok(Visit::Walked(TraversalResult::new(1, 0)));
            };
            self.observer.progress(depth, &item, &summary);

            let mut result = TraversalResult::new(1, 0);
            for child in self.children(reference).await? {
                let child = Reference::from(child);
                result += match self.visit(&child, depth + 1, preview_only).await? {
                    Visit::AlreadyClosed => TraversalResult::new(1, 0),
                    Visit::Walked(subtree) => subtree,
                };
            }

            let refreshed = self.fetch(reference).await?;
            match refreshed.summary {
                Some(summary) if summary.is_complete() => {
                    self.observer.closing(depth, &refreshed, preview_only);
                    if !preview_only {
                        self.close(&refreshed).await?;
                    }
                    result.closed += 1;
                }
                Some(summary) => self.observer.keeping_open(depth, &refreshed, &summary),
                None => {}
            }

            Ok(Visit::Walked(result))
        })
    }

    async fn fetch(&self, reference: &Reference) -> Result<Item> {
        self.store
            .get_item(&reference.container, reference.id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    RollupError::not_found(&reference.container, reference.id)
                } else {
                    e
                }
            })
    }

    async fn children(&self, reference: &Reference) -> Result<Vec<ChildRef>> {
        match self
            .store
            .list_children(&reference.container, reference.id)
            .await
        {
            Ok(children) => Ok(children),
            Err(e) if e.is_not_found() => {
                warn!(item = %reference, "child list not found, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn close(&self, item: &Item) -> Result<()> {
        self.store.close_item(&item.container, item.id).await?;
        self.store
            .add_note(&item.container, item.id, &self.note)
            .await?;
        info!(item = %item.reference(), title = %item.title, "closed item");
        Ok(())
    }
}
