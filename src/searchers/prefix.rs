//! A `Searcher` for very short queries.

use crate::context::SearchContext;
use crate::index::tokenizer::normalize;
use crate::searcher::{ScoredDoc, Searcher};
use crate::types::{MatchDetail, SearcherKind};

/// Matches records whose fast-path fields *start with* the query.
///
/// One or two characters would fuzzily match almost every record, so short
/// queries only consult the high-priority fields (identifier, title or
/// name) and only by whole-value prefix. A title that merely contains the
/// character further in is not a hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixSearch;

impl PrefixSearch {
  pub fn new() -> Self {
    Self
  }
}

impl Searcher for PrefixSearch {
  fn kind(&self) -> SearcherKind {
    SearcherKind::Prefix
  }

  /// Hits where a value equals the query get distance `0.0` (and the exact
  /// flag if the field is exact-boosted); other prefix hits get `1.0`, so
  /// they keep their collection order.
  fn search(&self, context: &SearchContext, query: &str) -> Vec<ScoredDoc> {
    let needle = normalize(query);
    if needle.is_empty() {
      return Vec::new();
    }

    let index = context.index;
    let fast_fields: Vec<usize> = index
      .fields()
      .iter()
      .enumerate()
      .filter(|(_, f)| f.rule.fast_path)
      .map(|(i, _)| i)
      .collect();

    let mut results = Vec::new();
    for doc in (0..index.len()).filter(|&doc| context.is_candidate(doc)) {
      let mut best: Option<ScoredDoc> = None;

      for &field in &fast_fields {
        let value = index.value(doc, field);
        if !value.starts_with(&needle) {
          continue;
        }

        let equal = value == needle;
        let candidate = ScoredDoc {
          doc,
          distance: if equal { 0.0 } else { 1.0 },
          exact: equal && index.fields()[field].rule.boost_exact,
          details: vec![MatchDetail {
            field: index.fields()[field].name.clone(),
            query_term: needle.clone(),
            matched_term: value.split(' ').next().unwrap_or(value).to_string(),
            cost: if equal { 0.0 } else { 1.0 },
          }],
        };

        let better = best
          .as_ref()
          .map_or(true, |b| candidate.rank_cmp(b) == std::cmp::Ordering::Less);
        if better {
          best = Some(candidate);
        }
      }

      results.extend(best);
    }

    results
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::index::SearchIndex;
  use crate::rules::{FieldRule, IndexRules};
  use serde_json::json;

  fn index() -> SearchIndex {
    let docs = vec![
      json!({"id": "12", "title": "Alpha", "body": "beta"}),
      json!({"id": "120", "title": "Beta", "body": "alpha"}),
      json!({"id": "7", "title": "Data Analysis", "body": ""}),
    ];
    let rules = IndexRules::builder()
      .field("id", FieldRule::exact().fast_path().boost_exact())
      .field("title", FieldRule::fuzzy().fast_path())
      .field("body", FieldRule::fuzzy().weight(0.2))
      .build();
    SearchIndex::build(&docs, &rules)
  }

  #[test]
  fn matches_only_value_starts() {
    let index = index();
    let ctx = SearchContext::new(&index);
    let hits: Vec<usize> = PrefixSearch.search(&ctx, "a").iter().map(|h| h.doc).collect();
    assert_eq!(hits, vec![0]);

    let hits: Vec<usize> = PrefixSearch.search(&ctx, "B").iter().map(|h| h.doc).collect();
    assert_eq!(hits, vec![1]);
  }

  #[test]
  fn literal_identifier_is_exact() {
    let index = index();
    let ctx = SearchContext::new(&index);
    let mut hits = PrefixSearch.search(&ctx, "12");
    hits.sort_by(ScoredDoc::rank_cmp);
    assert_eq!(hits.len(), 2);
    assert!(hits[0].exact);
    assert_eq!(hits[0].doc, 0);
    assert!(!hits[1].exact);
  }

  #[test]
  fn punctuation_only_matches_nothing() {
    let index = index();
    assert!(PrefixSearch.search(&SearchContext::new(&index), "?").is_empty());
  }

  #[test]
  fn respects_candidate_mask() {
    let index = index();
    let mask = [false, true, true];
    let ctx = SearchContext::new(&index).with_candidates(&mask);
    assert!(PrefixSearch.search(&ctx, "a").is_empty());
  }
}
