//! Loading and validating the paper/author snapshot.
//!
//! A [`Dataset`] is created once at startup and never mutated afterwards.
//! Validation, cross-reference construction and facet extraction happen in
//! a single pass; any inconsistency aborts loading with a [`SchemaError`].

pub mod records;

use crate::error::{NotFoundError, SchemaError};
use crate::filter::{Facets, FilterValue};
use crate::types::RecordKind;
use crate::xref::CrossRef;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::fs;
use std::path::Path;
use tracing::info;

use self::records::{Author, Paper, Snapshot, DATE_FORMAT};

/// The validated, immutable paper and author collections.
#[derive(Debug, Clone)]
pub struct Dataset {
  papers: Vec<Paper>,
  authors: Vec<Author>,
  xref: CrossRef,
  paper_facets: Vec<Facets>,
  author_facets: Vec<Facets>,
}

impl Dataset {
  /// Validates the two collections and builds the cross references.
  ///
  /// # Errors
  ///
  /// Returns a [`SchemaError`] if a mandatory field is blank, an
  /// identifier is duplicated, a session date does not parse, or a
  /// paper/author link is missing on either side.
  pub fn new(papers: Vec<Paper>, authors: Vec<Author>) -> Result<Self, SchemaError> {
    for paper in &papers {
      check_paper(paper)?;
    }
    for author in &authors {
      check_author(author)?;
    }

    let xref = CrossRef::build(&papers, &authors)?;

    let paper_facets: Vec<Facets> = papers.iter().map(paper_facets).collect();
    let author_facets: Vec<Facets> = (0..authors.len())
      .map(|a| {
        let mut facets = Facets::default();
        for &p in xref.papers_of(a) {
          facets.union(&paper_facets[p]);
        }
        facets
      })
      .collect();

    info!(papers = papers.len(), authors = authors.len(), "loaded dataset");

    Ok(Self {
      papers,
      authors,
      xref,
      paper_facets,
      author_facets,
    })
  }

  /// Builds a dataset from a combined snapshot.
  pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SchemaError> {
    Self::new(snapshot.papers, snapshot.authors)
  }

  /// Parses two JSON arrays, one per collection.
  pub fn from_json(papers_json: &str, authors_json: &str) -> Result<Self, SchemaError> {
    let papers = parse(RecordKind::Paper, papers_json)?;
    let authors = parse(RecordKind::Author, authors_json)?;
    Self::new(papers, authors)
  }

  /// Parses a single JSON object with `papers` and `authors` arrays.
  ///
  /// Each collection is parsed on its own so a malformed record is reported
  /// against the collection it belongs to. A document that is not an object
  /// at all is reported against papers.
  pub fn from_snapshot_json(json: &str) -> Result<Self, SchemaError> {
    let raw: RawSnapshot = serde_json::from_str(json).map_err(|e| SchemaError::Malformed {
      collection: RecordKind::Paper,
      message: e.to_string(),
    })?;
    let papers = parse(RecordKind::Paper, collection(RecordKind::Paper, &raw.papers)?)?;
    let authors = parse(RecordKind::Author, collection(RecordKind::Author, &raw.authors)?)?;
    Self::new(papers, authors)
  }

  /// Reads `papers.json` / `authors.json` style files.
  pub fn from_paths(papers: impl AsRef<Path>, authors: impl AsRef<Path>) -> Result<Self, SchemaError> {
    let papers = read(papers.as_ref())?;
    let authors = read(authors.as_ref())?;
    Self::from_json(&papers, &authors)
  }

  /// Reads a combined snapshot file.
  pub fn from_snapshot_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
    Self::from_snapshot_json(&read(path.as_ref())?)
  }

  pub fn papers(&self) -> &[Paper] {
    &self.papers
  }

  pub fn authors(&self) -> &[Author] {
    &self.authors
  }

  pub fn xref(&self) -> &CrossRef {
    &self.xref
  }

  /// Facet values per paper, aligned with [`Dataset::papers`].
  pub fn paper_facets(&self) -> &[Facets] {
    &self.paper_facets
  }

  /// Facet values per author (union over their papers), aligned with
  /// [`Dataset::authors`].
  pub fn author_facets(&self) -> &[Facets] {
    &self.author_facets
  }

  pub fn paper(&self, paper_number: &str) -> Result<&Paper, NotFoundError> {
    self
      .xref
      .paper_position(paper_number)
      .map(|p| &self.papers[p])
      .ok_or_else(|| NotFoundError::new(RecordKind::Paper, paper_number))
  }

  pub fn author(&self, author_id: &str) -> Result<&Author, NotFoundError> {
    self
      .xref
      .author_position(author_id)
      .map(|a| &self.authors[a])
      .ok_or_else(|| NotFoundError::new(RecordKind::Author, author_id))
  }

  /// All papers of `author_id`, in dataset order.
  pub fn papers_by_author(&self, author_id: &str) -> Result<Vec<&Paper>, NotFoundError> {
    self.xref.papers_by_author(&self.papers, author_id)
  }

  /// All authors of `paper_number`, in byline order.
  pub fn authors_by_paper(&self, paper_number: &str) -> Result<Vec<&Author>, NotFoundError> {
    self.xref.authors_by_paper(&self.authors, paper_number)
  }
}

fn check_paper(paper: &Paper) -> Result<(), SchemaError> {
  if paper.paper_number.trim().is_empty() {
    return Err(SchemaError::MissingField {
      collection: RecordKind::Paper,
      id: paper.title.clone(),
      field: "paper_number",
    });
  }
  if paper.title.trim().is_empty() {
    return Err(SchemaError::MissingField {
      collection: RecordKind::Paper,
      id: paper.paper_number.clone(),
      field: "title",
    });
  }
  if let Some(raw) = &paper.schedule.session_date {
    if NaiveDate::parse_from_str(raw, DATE_FORMAT).is_err() {
      return Err(SchemaError::InvalidDate {
        collection: RecordKind::Paper,
        id: paper.paper_number.clone(),
        value: raw.clone(),
      });
    }
  }
  Ok(())
}

fn check_author(author: &Author) -> Result<(), SchemaError> {
  if author.id.trim().is_empty() {
    return Err(SchemaError::MissingField {
      collection: RecordKind::Author,
      id: author.name.clone(),
      field: "id",
    });
  }
  if author.name.trim().is_empty() {
    return Err(SchemaError::MissingField {
      collection: RecordKind::Author,
      id: author.id.clone(),
      field: "name",
    });
  }
  Ok(())
}

fn paper_facets(paper: &Paper) -> Facets {
  Facets {
    track: paper
      .track
      .iter()
      .map(|t| FilterValue::Text(t.clone()))
      .collect(),
    presentation: vec![FilterValue::Text(paper.presentation_type.label().to_string())],
    date: paper.session_date().map(FilterValue::Date).into_iter().collect(),
    attendance: paper
      .attendance
      .label()
      .map(|l| FilterValue::Text(l.to_string()))
      .into_iter()
      .collect(),
  }
}

fn parse<T: DeserializeOwned>(collection: RecordKind, json: &str) -> Result<Vec<T>, SchemaError> {
  serde_json::from_str(json).map_err(|e| SchemaError::Malformed {
    collection,
    message: e.to_string(),
  })
}

/// A snapshot with both collections still unparsed.
#[derive(Deserialize)]
struct RawSnapshot {
  #[serde(default)]
  papers: Option<Box<RawValue>>,
  #[serde(default)]
  authors: Option<Box<RawValue>>,
}

fn collection(kind: RecordKind, raw: &Option<Box<RawValue>>) -> Result<&str, SchemaError> {
  raw
    .as_deref()
    .map(RawValue::get)
    .ok_or_else(|| SchemaError::Malformed {
      collection: kind,
      message: format!("snapshot has no `{}` collection", collection_key(kind)),
    })
}

fn collection_key(kind: RecordKind) -> &'static str {
  match kind {
    RecordKind::Paper => "papers",
    RecordKind::Author => "authors",
  }
}

fn read(path: &Path) -> Result<String, SchemaError> {
  fs::read_to_string(path).map_err(|e| SchemaError::Io {
    path: path.display().to_string(),
    message: e.to_string(),
  })
}
