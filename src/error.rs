//! Error types for relationship discovery.
//!
//! The engine distinguishes two failure classes: configuration problems,
//! which abort a run before any analysis starts, and adapter failures,
//! which are passed back to the caller unchanged. Everything else degrades
//! gracefully: a malformed table is skipped with a note in the summary,
//! and per-candidate anomalies only lower scores.

use thiserror::Error;

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that can abort a discovery run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The engine configuration is invalid (bad weights, thresholds out of range).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A table identifier could not be parsed into workspace/schema/table parts.
    #[error("unparseable table identifier: '{identifier}'")]
    BadIdentifier { identifier: String },

    /// The metadata adapter failed while listing tables or columns.
    ///
    /// Sample-value fetch failures are *not* surfaced here; they degrade to
    /// absent samples for the affected column.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Error reported by an external [`MetadataAdapter`](crate::metadata::MetadataAdapter).
#[derive(Debug, Error)]
#[error("metadata adapter error: {message}")]
pub struct AdapterError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AdapterError {
    /// Create an adapter error from a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an adapter error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
