//! Confsearch - search and browse a conference's papers and authors.
//!
//! Confsearch loads a static snapshot of papers and authors, validates the
//! links between them and builds an in-memory index once. After that every
//! search is a pure function of the query state: typo-tolerant matching for
//! longer queries, prefix matching for one or two characters, facet filters
//! over track, presentation type, session date and attendance, and stable
//! 1-based pagination.
//!
//! The [`Catalog`](engine::Catalog) is the entry point; a
//! [`SearchCoordinator`](debounce::SearchCoordinator) debounces rapid input
//! and drops results of superseded queries.

pub mod config;
pub mod context;
pub mod dataset;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod rules;
pub mod searcher;
pub mod searchers;
pub mod types;
pub mod xref;

pub use error::{Error, Result};

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::context::*;
    pub use crate::dataset::records::*;
    pub use crate::dataset::Dataset;
    pub use crate::debounce::*;
    pub use crate::engine::*;
    pub use crate::error::{ConfigError, Error, NotFoundError, QueryError, SchemaError};
    pub use crate::filter::*;
    pub use crate::index::SearchIndex;
    pub use crate::rules::*;
    pub use crate::searcher::*;
    pub use crate::searchers::*;
    pub use crate::types::*;
    pub use crate::xref::CrossRef;
}
