//! A `Searcher` implementation for fuzzy (approximate) term matching.

use crate::context::SearchContext;
use crate::index::tokenizer::{normalize, tokenize};
use crate::index::{SearchIndex, Term};
use crate::rules::Matcher;
use crate::searcher::{ScoredDoc, Searcher};
use crate::types::{MatchDetail, SearcherKind};
use std::collections::HashMap;
use strsim::damerau_levenshtein;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Upper bound of the cost of a prefix completion.
const PREFIX_COST: f32 = 0.2;
/// Base cost of any match that needs edits; keeps typos behind completions.
const EDIT_BASE_COST: f32 = 0.2;

/// A searcher that matches query terms against the index vocabulary using
/// exact, prefix and Damerau-Levenshtein comparisons.
///
/// Every query term must match somewhere in the record. A term's cost is
/// the cheapest of its matches, each one the term cost plus the penalty of
/// the field it occurred in, so a match in the title beats the same match
/// in the abstract. The record's distance is the mean term cost.
#[derive(Debug, Clone, Default)]
pub struct FuzzySearch;

impl FuzzySearch {
  pub fn new() -> Self {
    Self
  }

  /// Edits tolerated for `term`: none up to three characters, one up to
  /// six, two beyond, never more than `max`.
  pub fn allowed_edits(term: &str, max: usize) -> usize {
    let allowed = match term.chars().count() {
      0..=3 => 0,
      4..=6 => 1,
      _ => 2,
    };
    allowed.min(max)
  }

  /// Cost of matching query term `query` to vocabulary term `term`.
  ///
  /// `0.0` if identical, below [`PREFIX_COST`] if `term` extends `query`,
  /// otherwise at least [`EDIT_BASE_COST`] if within `allowed` edits.
  pub fn term_cost(query: &str, term: &str, allowed: usize) -> Option<f32> {
    if query == term {
      return Some(0.0);
    }

    let query_len = query.chars().count();
    let term_len = term.chars().count();

    if term.starts_with(query) {
      return Some(PREFIX_COST * (1.0 - query_len as f32 / term_len as f32));
    }

    // OPTIMIZATION: Length-based pruning, the distance is at least the length gap
    if allowed == 0 || query_len.abs_diff(term_len) > allowed {
      return None;
    }

    let edits = damerau_levenshtein(query, term);
    (edits <= allowed).then(|| (EDIT_BASE_COST + edits as f32 / query_len as f32).min(1.0))
  }

  /// Vocabulary terms matching `query`, in vocabulary order.
  #[cfg(feature = "parallel")]
  fn matching_terms<'i>(index: &'i SearchIndex, query: &str, allowed: usize) -> Vec<(&'i Term, f32)> {
    index
      .terms()
      .par_iter()
      .filter_map(|t| Self::term_cost(query, &t.text, allowed).map(|cost| (t, cost)))
      .collect()
  }

  /// Vocabulary terms matching `query`, in vocabulary order.
  #[cfg(not(feature = "parallel"))]
  fn matching_terms<'i>(index: &'i SearchIndex, query: &str, allowed: usize) -> Vec<(&'i Term, f32)> {
    index
      .terms()
      .iter()
      .filter_map(|t| Self::term_cost(query, &t.text, allowed).map(|cost| (t, cost)))
      .collect()
  }
}

impl Searcher for FuzzySearch {
  fn kind(&self) -> SearcherKind {
    SearcherKind::Fuzzy
  }

  fn search(&self, context: &SearchContext, query: &str) -> Vec<ScoredDoc> {
    let mut query_terms = tokenize(query);
    let mut seen = std::collections::HashSet::new();
    query_terms.retain(|t| seen.insert(t.clone()));
    if query_terms.is_empty() {
      return Vec::new();
    }

    let index = context.index;
    let fields = index.fields();
    let slots = query_terms.len();
    let mut per_doc: HashMap<usize, Vec<Option<MatchDetail>>> = HashMap::new();

    for (slot, query_term) in query_terms.iter().enumerate() {
      let allowed = Self::allowed_edits(query_term, context.max_edit_distance);

      for (term, cost) in Self::matching_terms(index, query_term, allowed) {
        for posting in &term.postings {
          if !context.is_candidate(posting.doc) {
            continue;
          }
          let field = &fields[posting.field];
          if field.rule.matcher == Matcher::Exact && cost > 0.0 {
            continue;
          }
          // A record missing an earlier term can no longer match.
          if slot > 0 && !per_doc.contains_key(&posting.doc) {
            continue;
          }

          let total = cost + field.penalty;
          let entry = per_doc
            .entry(posting.doc)
            .or_insert_with(|| vec![None; slots]);
          if entry[slot].as_ref().map_or(true, |m| total < m.cost) {
            entry[slot] = Some(MatchDetail {
              field: field.name.clone(),
              query_term: query_term.clone(),
              matched_term: term.text.clone(),
              cost: total,
            });
          }
        }
      }

      per_doc.retain(|_, entry| entry[slot].is_some());
      if per_doc.is_empty() {
        return Vec::new();
      }
    }

    let needle = normalize(query);
    let boosted: Vec<usize> = fields
      .iter()
      .enumerate()
      .filter(|(_, f)| f.rule.boost_exact)
      .map(|(i, _)| i)
      .collect();

    per_doc
      .into_iter()
      .map(|(doc, entry)| {
        let details: Vec<MatchDetail> = entry.into_iter().flatten().collect();
        let exact = boosted.iter().any(|&f| index.value(doc, f) == needle);
        let distance = if exact {
          0.0
        } else {
          details.iter().map(|d| d.cost).sum::<f32>() / slots as f32
        };
        ScoredDoc {
          doc,
          distance,
          exact,
          details,
        }
      })
      .collect()
  }
}
