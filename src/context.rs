//! Context provided to searchers during a search operation.

use crate::index::SearchIndex;

/// Everything a [`Searcher`](crate::searcher::Searcher) needs for one query.
///
/// `candidates`, when present, is a mask aligned with the index: records
/// whose entry is `false` must not be scored. When absent every record is
/// a candidate.
pub struct SearchContext<'a> {
  /// The index of the collection being searched.
  pub index: &'a SearchIndex,
  /// Pre-filter mask, see above.
  pub candidates: Option<&'a [bool]>,
  /// Upper bound on edits tolerated per query term.
  pub max_edit_distance: usize,
}

impl<'a> SearchContext<'a> {
  /// Creates a context over every record of `index`.
  pub fn new(index: &'a SearchIndex) -> Self {
    Self {
      index,
      candidates: None,
      max_edit_distance: 2,
    }
  }

  /// Restricts scoring to the records marked `true` in `mask`.
  pub fn with_candidates(mut self, mask: &'a [bool]) -> Self {
    self.candidates = Some(mask);
    self
  }

  /// Sets the maximum edit distance.
  pub fn with_max_edit_distance(mut self, edits: usize) -> Self {
    self.max_edit_distance = edits;
    self
  }

  /// Whether record `doc` may be scored.
  pub fn is_candidate(&self, doc: usize) -> bool {
    self
      .candidates
      .map_or(true, |mask| mask.get(doc).copied().unwrap_or(false))
  }
}
