//! Core data types shared across the engine.

use crate::filter::FilterSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// The two record collections of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
  Paper,
  Author,
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecordKind::Paper => f.write_str("paper"),
      RecordKind::Author => f.write_str("author"),
    }
  }
}

/// The strategy that produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearcherKind {
  /// Empty query: every (filtered) record in collection order.
  Browse,
  /// Short query: prefix match against the fast-path fields only.
  Prefix,
  /// Full fuzzy scoring across every weighted field.
  Fuzzy,
}

/// A single matched record.
///
/// `distance` is lower-is-better. Exact hits (literal identifier or whole
/// title equality) always rank above inexact ones regardless of distance.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a, T> {
  /// The matched record, borrowed from the immutable dataset.
  pub record: &'a T,
  /// Position of the record in its collection (the natural order).
  pub position: usize,
  /// Aggregate match distance, `0.0` for a perfect match.
  pub distance: f32,
  /// Whether the whole query equals an exact-boosted field.
  pub exact: bool,
  /// Which strategy produced this hit.
  pub strategy: SearcherKind,
  /// Per-token explanation of the match.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub details: Vec<MatchDetail>,
}

/// Explains how one query term matched a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
  /// The indexed field the term matched in.
  pub field: String,
  /// The query term as normalized.
  pub query_term: String,
  /// The indexed term it matched.
  pub matched_term: String,
  /// Cost of this term match, field penalty included.
  pub cost: f32,
}

/// A fixed-size slice of a ranked result list.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  /// Records on this page, in rank order.
  pub items: Vec<T>,
  /// Total number of matches across all pages.
  pub total: usize,
  /// The 1-based page number this slice represents.
  pub page: usize,
  /// The page size used to slice the results.
  pub page_size: usize,
  /// Whether a later page holds more records.
  pub has_more: bool,
}

impl<T> Page<T> {
  /// Slices `ranked` into the requested 1-based page.
  ///
  /// A page past the end is empty with `has_more == false`; it is not an
  /// error. Callers validate `page >= 1` and `page_size >= 1` beforehand.
  pub fn slice(ranked: Vec<T>, page: usize, page_size: usize) -> Self {
    let total = ranked.len();
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let end = start.saturating_add(page_size);

    let items: Vec<T> = if start >= total {
      Vec::new()
    } else {
      ranked.into_iter().skip(start).take(page_size).collect()
    };

    Self {
      items,
      total,
      page,
      page_size,
      has_more: end < total,
    }
  }

  /// Number of pages needed to show every match.
  pub fn page_count(&self) -> usize {
    if self.page_size == 0 {
      return 0;
    }
    self.total.div_ceil(self.page_size)
  }

  /// Maps the items of the page, keeping the paging metadata.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items: self.items.into_iter().map(f).collect(),
      total: self.total,
      page: self.page,
      page_size: self.page_size,
      has_more: self.has_more,
    }
  }
}

/// One user interaction worth of search input.
///
/// A `QueryState` is a value: the coordinator replaces it wholesale on each
/// interaction instead of mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
  /// Free-text query; an empty string browses the whole collection.
  #[serde(default)]
  pub query: String,
  /// Active facet filters.
  #[serde(default)]
  pub filters: FilterSet,
  /// 1-based page number.
  #[serde(default = "default_page")]
  pub page: usize,
  /// Records per page.
  #[serde(default = "default_page_size")]
  pub page_size: usize,
}

fn default_page() -> usize {
  1
}

fn default_page_size() -> usize {
  DEFAULT_PAGE_SIZE
}

impl Default for QueryState {
  fn default() -> Self {
    Self {
      query: String::new(),
      filters: FilterSet::default(),
      page: default_page(),
      page_size: default_page_size(),
    }
  }
}

impl QueryState {
  /// Creates a state for the first page of `query` with no filters.
  pub fn new(query: impl Into<String>) -> Self {
    Self {
      query: query.into(),
      ..Default::default()
    }
  }

  /// Creates a new `QueryStateBuilder`.
  pub fn builder() -> QueryStateBuilder {
    QueryStateBuilder::default()
  }

  /// Returns the same query and filters positioned at another page.
  pub fn with_page(&self, page: usize) -> Self {
    Self {
      page,
      ..self.clone()
    }
  }
}

/// A builder for creating `QueryState` instances.
#[derive(Debug, Default)]
pub struct QueryStateBuilder {
  state: QueryState,
}

impl QueryStateBuilder {
  /// Sets the free-text query.
  pub fn query(mut self, query: impl Into<String>) -> Self {
    self.state.query = query.into();
    self
  }

  /// Sets the facet filters.
  pub fn filters(mut self, filters: FilterSet) -> Self {
    self.state.filters = filters;
    self
  }

  /// Sets the 1-based page number.
  pub fn page(mut self, page: usize) -> Self {
    self.state.page = page;
    self
  }

  /// Sets the number of records per page.
  pub fn page_size(mut self, page_size: usize) -> Self {
    self.state.page_size = page_size;
    self
  }

  /// Builds the final `QueryState`.
  pub fn build(self) -> QueryState {
    self.state
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slice_middle_and_last_page() {
    let ranked: Vec<u32> = (1..=5).collect();

    let first = Page::slice(ranked.clone(), 1, 2);
    assert_eq!(first.items, vec![1, 2]);
    assert!(first.has_more);
    assert_eq!(first.page_count(), 3);

    let last = Page::slice(ranked, 3, 2);
    assert_eq!(last.items, vec![5]);
    assert!(!last.has_more);
    assert_eq!(last.total, 5);
  }

  #[test]
  fn slice_past_the_end_is_empty() {
    let page = Page::slice(vec!['a', 'b'], 7, 2);
    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.total, 2);
  }

  #[test]
  fn exact_fit_has_no_more() {
    let page = Page::slice(vec![1, 2, 3, 4], 2, 2);
    assert_eq!(page.items, vec![3, 4]);
    assert!(!page.has_more);
  }

  #[test]
  fn query_state_defaults_from_json() {
    let state: QueryState = serde_json::from_str(r#"{"query": "bert"}"#).unwrap();
    assert_eq!(state.page, 1);
    assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
    assert!(state.filters.is_empty());
  }
}
