//! Error types for confsearch.
//!
//! Load-time problems are [`SchemaError`]s and abort initialization.
//! Lookups of unknown identifiers produce a [`NotFoundError`], and invalid
//! query parameters produce a [`QueryError`]. Neither of the latter two
//! affects any other operation on the catalog.

use crate::types::RecordKind;
use chrono::NaiveDate;
use thiserror::Error;

/// The dataset snapshot is malformed or internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
  /// The serialized collection did not parse into the expected record shape.
  #[error("malformed {collection} collection: {message}")]
  Malformed {
    collection: RecordKind,
    message: String,
  },
  /// A mandatory field is absent or blank.
  #[error("{collection} `{id}` is missing required field `{field}`")]
  MissingField {
    collection: RecordKind,
    id: String,
    field: &'static str,
  },
  /// Two records of the same collection share an identifier.
  #[error("duplicate {collection} identifier `{id}`")]
  DuplicateId { collection: RecordKind, id: String },
  /// A record references an identifier absent from the other collection.
  #[error("{from} `{id}` references unknown {to} `{missing}`")]
  DanglingReference {
    from: RecordKind,
    id: String,
    to: RecordKind,
    missing: String,
  },
  /// One side of the paper/author relationship is missing.
  #[error("paper `{paper}` and author `{author}` do not reference each other both ways")]
  AsymmetricLink { paper: String, author: String },
  /// A date field could not be parsed.
  #[error("{collection} `{id}` has invalid date `{value}`")]
  InvalidDate {
    collection: RecordKind,
    id: String,
    value: String,
  },
  /// Records, facets and index handed to the engine differ in length.
  #[error("misaligned corpus: {records} records, {facets} facet rows, {indexed} indexed")]
  Misaligned {
    records: usize,
    facets: usize,
    indexed: usize,
  },
  /// The snapshot could not be read from disk.
  #[error("failed to read dataset `{path}`: {message}")]
  Io { path: String, message: String },
}

/// A cross-reference or direct lookup for an unknown identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no such {kind}: `{id}`")]
pub struct NotFoundError {
  pub kind: RecordKind,
  pub id: String,
}

impl NotFoundError {
  pub fn new(kind: RecordKind, id: impl Into<String>) -> Self {
    Self {
      kind,
      id: id.into(),
    }
  }
}

/// The query state cannot be evaluated.
///
/// These are surfaced as validation messages. They are never turned into an
/// empty page, which would be indistinguishable from "no matches".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
  /// The date range filter starts after it ends.
  #[error("invalid date range: {start} is after {end}")]
  InvalidDateRange { start: NaiveDate, end: NaiveDate },
  /// Pages are numbered from 1.
  #[error("page numbers start at 1")]
  InvalidPage,
  /// A page must hold at least one record.
  #[error("page size must be at least 1")]
  InvalidPageSize,
}

/// The engine configuration could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("invalid configuration: {0}")]
  Parse(String),
  #[error("failed to read configuration `{path}`: {message}")]
  Io { path: String, message: String },
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error(transparent)]
  Schema(#[from] SchemaError),
  #[error(transparent)]
  NotFound(#[from] NotFoundError),
  #[error(transparent)]
  Query(#[from] QueryError),
  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// Result alias used by the catalog facade.
pub type Result<T, E = Error> = std::result::Result<T, E>;
