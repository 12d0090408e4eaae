//! The `Searcher` trait, which defines the interface for text strategies.

use crate::context::SearchContext;
use crate::types::{MatchDetail, SearcherKind};

/// A record matched by a searcher, identified by its position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
  /// Position of the record in its collection.
  pub doc: usize,
  /// Lower is better; `0.0` is a perfect match.
  pub distance: f32,
  /// Whole-query equality on an exact-boosted field.
  pub exact: bool,
  pub details: Vec<MatchDetail>,
}

impl ScoredDoc {
  /// The total ranking order: exact first, then distance, then position.
  pub fn rank_cmp(&self, other: &Self) -> std::cmp::Ordering {
    other
      .exact
      .cmp(&self.exact)
      .then_with(|| self.distance.total_cmp(&other.distance))
      .then_with(|| self.doc.cmp(&other.doc))
  }
}

/// A text matching strategy over a [`SearchIndex`](crate::index::SearchIndex).
///
/// A searcher scores each candidate independently of every other record,
/// which is what makes filtering before and after scoring equivalent.
pub trait Searcher: Send + Sync {
  /// Returns the `SearcherKind` of this searcher.
  fn kind(&self) -> SearcherKind;

  /// Scores every candidate record of `context` against `query`.
  ///
  /// # Arguments
  ///
  /// * `context` - The index, candidate mask and tuning knobs.
  /// * `query` - The trimmed, non-empty query text.
  ///
  /// # Returns
  ///
  /// The matching records in no particular order. The engine applies the
  /// total order of [`ScoredDoc::rank_cmp`].
  fn search(&self, context: &SearchContext, query: &str) -> Vec<ScoredDoc>;
}
