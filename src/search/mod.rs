//! Full-text search over documentation entries.
//!
//! This module provides an in-memory inverted index with stemming, stop-word
//! filtering, typo-tolerant matching, faceting and prefix suggestions.

// Module declarations
pub(crate) mod fuzzy;
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use fuzzy::{edit_distance, is_fuzzy_match};
pub use index::{
    DocIndex, ExportData, Facets, Field, IndexOptions, IndexOptionsOverride, IndexStats,
};
pub use query::{SearchHit, SearchOptions};
pub use tokenize::{STOP_WORDS, Tokenizer, stem};
