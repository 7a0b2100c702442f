//! Error types for the search engine.
//!
//! Degenerate numeric cases inside the search (empty results, zero visits,
//! zero total weight) are never errors. Errors are reserved for the agent
//! boundary and for configuration checks.

use thiserror::Error;

/// Errors surfaced by the agent and configuration layers.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SearchError {
    #[error("No legal actions available")]
    NoLegalActions,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Search worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
