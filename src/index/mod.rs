//! The fuzzy-searchable index built once per collection.
//!
//! A [`SearchIndex`] holds, for every record, the normalized value of each
//! configured field, plus a sorted vocabulary mapping every token to the
//! `(record, field)` pairs it occurs in. Records are addressed by their
//! position in the collection, which is also their natural order.

pub mod tokenizer;

use crate::rules::{FieldRule, IndexRules};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use self::tokenizer::tokenize;

/// An occurrence of a term: record position and field slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Posting {
  pub doc: usize,
  pub field: usize,
}

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
  pub text: String,
  /// Occurrences sorted by record, then field. No duplicates.
  pub postings: Vec<Posting>,
}

/// A configured field together with its derived ranking penalty.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedField {
  pub name: String,
  pub rule: FieldRule,
  /// `1 - weight / max_weight`: zero for the heaviest field.
  pub penalty: f32,
}

/// Derived search structure over one record collection.
///
/// Building is pure: the same records and rules always produce an equal
/// index. There is no incremental update; the dataset is static.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchIndex {
  fields: Vec<IndexedField>,
  /// `values[doc][field]`: normalized whole value, empty when absent.
  values: Vec<Vec<String>>,
  /// Sorted by `text`.
  terms: Vec<Term>,
}

impl SearchIndex {
  /// Builds an index over `records` according to `rules`.
  ///
  /// Each record is serialized to JSON to read its fields, so any
  /// `Serialize` type can be indexed. Missing fields and non-text values
  /// are indexed as empty.
  pub fn build<T: Serialize>(records: &[T], rules: &IndexRules) -> Self {
    let max_weight = rules
      .fields
      .iter()
      .map(|(_, rule)| rule.weight)
      .fold(f32::EPSILON, f32::max);

    let fields: Vec<IndexedField> = rules
      .fields
      .iter()
      .map(|(name, rule)| IndexedField {
        name: name.clone(),
        rule: rule.clone(),
        penalty: 1.0 - rule.weight / max_weight,
      })
      .collect();

    let mut vocabulary: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
    let mut values = Vec::with_capacity(records.len());

    for (doc, record) in records.iter().enumerate() {
      let json = serde_json::to_value(record).unwrap_or(Value::Null);
      let mut doc_values = Vec::with_capacity(fields.len());

      for (field, indexed) in fields.iter().enumerate() {
        let text = extract_field(&json, &indexed.name).unwrap_or_default();
        let tokens = tokenize(&text);

        for token in &tokens {
          let postings = vocabulary.entry(token.clone()).or_default();
          let posting = Posting { doc, field };
          if postings.last() != Some(&posting) {
            postings.push(posting);
          }
        }

        doc_values.push(tokens.join(" "));
      }

      values.push(doc_values);
    }

    let terms: Vec<Term> = vocabulary
      .into_iter()
      .map(|(text, postings)| Term { text, postings })
      .collect();

    debug!(
      records = records.len(),
      fields = fields.len(),
      terms = terms.len(),
      "built search index"
    );

    Self {
      fields,
      values,
      terms,
    }
  }

  /// Number of indexed records.
  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn fields(&self) -> &[IndexedField] {
    &self.fields
  }

  /// The sorted vocabulary.
  pub fn terms(&self) -> &[Term] {
    &self.terms
  }

  /// Looks up a single vocabulary entry.
  pub fn term(&self, text: &str) -> Option<&Term> {
    self
      .terms
      .binary_search_by(|t| t.text.as_str().cmp(text))
      .ok()
      .map(|i| &self.terms[i])
  }

  /// The normalized value of `field` for record `doc`.
  pub fn value(&self, doc: usize, field: usize) -> &str {
    self
      .values
      .get(doc)
      .and_then(|v| v.get(field))
      .map(String::as_str)
      .unwrap_or("")
  }
}

/// Reads a possibly nested (`a.b`) field from a JSON value as text.
///
/// Arrays of scalars are joined with spaces.
fn extract_field(value: &Value, path: &str) -> Option<String> {
  let mut current = value;
  for part in path.split('.') {
    current = current.get(part)?;
  }
  scalar_text(current).or_else(|| match current {
    Value::Array(items) => {
      let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
      Some(parts.join(" "))
    }
    _ => None,
  })
}

fn scalar_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}
