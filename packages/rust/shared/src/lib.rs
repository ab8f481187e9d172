//! Shared types, error model, and configuration for rollup.
//!
//! This crate is the foundation depended on by all other rollup crates.
//! It provides:
//! - [`RollupError`], the unified error type
//! - Domain types ([`Item`], [`Reference`], [`Container`], [`TraversalResult`])
//! - Configuration ([`AppConfig`], config loading, token lookup)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ClosingConfig, DEFAULT_CLOSE_NOTE, DisplayConfig, GitHubConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, missing_token_error,
    token_from_env,
};
pub use error::{Result, RollupError};
pub use types::{
    ChildRef, CompletionSummary, Container, Item, ItemState, Reference, TraversalResult,
};
