//! Error handling types and utilities.

/// A specialized Result type for opdocs-mcp operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a mutation of the search index violates its contract.
///
/// Not-found conditions are never errors: removing an unknown id or searching
/// an empty category degrades to a no-op or an empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// An entry was added without an identifier.
    #[error("cannot index entry '{name}': entry id is missing")]
    MissingId { name: String },
}
