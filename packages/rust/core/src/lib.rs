//! Completion propagation for rollup.
//!
//! This crate holds the two pieces with real logic: resolving item
//! locators ([`reference::resolve`]) and walking a hierarchy to close
//! completed parents ([`propagate::propagate`]). The remote tracker is
//! reached only through the [`store::ItemStore`] trait.

pub mod observer;
pub mod propagate;
pub mod reference;
pub mod store;

pub use observer::{SilentObserver, TraversalObserver};
pub use propagate::{Propagator, propagate};
pub use reference::resolve;
pub use rollup_shared::DEFAULT_CLOSE_NOTE;
pub use store::ItemStore;
