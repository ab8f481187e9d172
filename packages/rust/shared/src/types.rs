//! Core domain types for item hierarchies.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Container / Reference
// ---------------------------------------------------------------------------

/// Where an item lives: a `(namespace, name)` pair such as `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Container {
    /// Owning namespace (user or organisation).
    pub namespace: String,
    /// Container name within the namespace.
    pub name: String,
}

impl Container {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A resolved item locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub container: Container,
    pub id: u64,
}

impl Reference {
    pub fn new(container: Container, id: u64) -> Self {
        Self { container, id }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.container, self.id)
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Open/closed lifecycle state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// Child completion counts reported by the store for a parent item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub total: u32,
    pub completed: u32,
    /// 0..=100, as reported by the store.
    pub percent_complete: u8,
}

impl CompletionSummary {
    pub fn new(total: u32, completed: u32) -> Self {
        let percent_complete = if total == 0 {
            0
        } else {
            ((u64::from(completed.min(total)) * 100) / u64::from(total)) as u8
        };
        Self {
            total,
            completed,
            percent_complete,
        }
    }

    /// Every child is complete.
    pub fn is_complete(&self) -> bool {
        self.percent_complete == 100
    }
}

impl fmt::Display for CompletionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}%)",
            self.completed, self.total, self.percent_complete
        )
    }
}

/// A unit in the tracking hierarchy, as read from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub container: Container,
    pub title: String,
    pub state: ItemState,
    /// Present only when the item has children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<CompletionSummary>,
}

impl Item {
    /// The reference this item was read from.
    pub fn reference(&self) -> Reference {
        Reference::new(self.container.clone(), self.id)
    }

    pub fn is_closed(&self) -> bool {
        self.state == ItemState::Closed
    }

    /// Summary with at least one child, if any.
    pub fn children_summary(&self) -> Option<&CompletionSummary> {
        self.summary.as_ref().filter(|s| s.total > 0)
    }
}

/// A direct child as listed by the store. The container is per child:
/// hierarchies may span containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    pub id: u64,
    pub container: Container,
}

impl From<ChildRef> for Reference {
    fn from(child: ChildRef) -> Self {
        Reference::new(child.container, child.id)
    }
}

// ---------------------------------------------------------------------------
// TraversalResult
// ---------------------------------------------------------------------------

/// Counts accumulated by a propagation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalResult {
    /// Nodes actually visited (already-closed nodes are not counted).
    pub processed: usize,
    /// Nodes closed, or that would be closed in preview mode.
    pub closed: usize,
}

impl TraversalResult {
    pub fn new(processed: usize, closed: usize) -> Self {
        Self { processed, closed }
    }
}

impl AddAssign for TraversalResult {
    fn add_assign(&mut self, rhs: Self) {
        self.processed += rhs.processed;
        self.closed += rhs.closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_percent_is_floor() {
        assert_eq!(CompletionSummary::new(3, 2).percent_complete, 66);
        assert_eq!(CompletionSummary::new(2, 2).percent_complete, 100);
        assert!(!CompletionSummary::new(0, 0).is_complete());
        assert!(CompletionSummary::new(1, 1).is_complete());
    }

    #[test]
    fn reference_display() {
        let r = Reference::new(Container::new("octo", "widgets"), 7);
        assert_eq!(r.to_string(), "octo/widgets#7");
    }

    #[test]
    fn item_state_serde_lowercase() {
        let json = serde_json::to_string(&ItemState::Closed).unwrap();
        assert_eq!(json, "\"closed\"");
        let state: ItemState = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(state, ItemState::Open);
    }

    #[test]
    fn empty_summary_counts_as_no_children() {
        let item = Item {
            id: 1,
            container: Container::new("a", "b"),
            title: "t".into(),
            state: ItemState::Open,
            summary: Some(CompletionSummary::new(0, 0)),
        };
        assert!(item.children_summary().is_none());
    }

    #[test]
    fn traversal_results_accumulate() {
        let mut total = TraversalResult::new(1, 0);
        total += TraversalResult::new(2, 1);
        total += TraversalResult::default();
        assert_eq!(total, TraversalResult::new(3, 1));
    }
}
