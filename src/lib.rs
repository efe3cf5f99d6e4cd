//! Documentation search for operator catalogs, served to AI assistants over MCP.
//!
//! The core is [`DocIndex`], an in-memory inverted index over [`Entry`]
//! records with stemming, fuzzy matching, faceting and prefix suggestions.

pub mod config;
pub mod corpus;
pub mod entry;
pub mod error;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use entry::{
    Category, Entry, EntryMatch, EntrySummary, FieldMatch, MatchField, Parameter,
    ValidationReport,
};
pub use error::IndexError;
pub use search::{
    DocIndex, ExportData, Facets, Field, IndexOptions, IndexStats, SearchHit, SearchOptions,
};
pub use server::DocServer;
pub use state::DocState;
