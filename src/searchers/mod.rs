//! The built-in `Searcher` implementations.
//!
//! The engine picks one per query from the trimmed query length:
//!
//! - [`PrefixSearch`]: short queries, whole-value prefix on fast-path fields.
//! - [`FuzzySearch`]: everything longer, typo-tolerant scoring on all fields.

/// Implements the fuzzy term searcher.
pub mod fuzzy;
/// Implements the short-query prefix searcher.
pub mod prefix;

pub use fuzzy::FuzzySearch;
pub use prefix::PrefixSearch;
