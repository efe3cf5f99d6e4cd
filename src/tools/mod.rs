pub mod facets;
pub mod get_entry;
pub mod search;
pub mod suggest;

pub use facets::*;
pub use get_entry::*;
pub use search::*;
pub use suggest::*;
