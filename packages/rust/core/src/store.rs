//! The remote item store seen by the propagator.

use async_trait::async_trait;
use rollup_shared::{ChildRef, Container, Item, Result};

/// Read and mutate items in a remote tracker.
///
/// Implementations report an absent item as
/// [`RollupError::NotFound`](rollup_shared::RollupError::NotFound); every
/// other failure is passed through unchanged by the propagator. Transport
/// timeouts and retries are the implementation's business.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetch a single item with its current completion summary.
    async fn get_item(&self, container: &Container, id: u64) -> Result<Item>;

    /// Direct children of an item, in the store's order.
    async fn list_children(&self, container: &Container, id: u64) -> Result<Vec<ChildRef>>;

    /// Move an item to the closed state with reason "completed".
    async fn close_item(&self, container: &Container, id: u64) -> Result<()>;

    /// Append a comment to an item.
    async fn add_note(&self, container: &Container, id: u64, text: &str) -> Result<()>;
}
