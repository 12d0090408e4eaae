//! Paper <-> author cross references.
//!
//! Both collections stay plain vectors; the relationship is held as
//! position-based adjacency lists plus identifier maps, built once while the
//! dataset is validated. Lookups never touch the search index.

use crate::dataset::records::{Author, Paper};
use crate::error::{NotFoundError, SchemaError};
use crate::types::RecordKind;
use std::collections::{HashMap, HashSet};

/// Identifier maps and adjacency lists over the two collections.
#[derive(Debug, Clone, Default)]
pub struct CrossRef {
  paper_ids: HashMap<String, usize>,
  author_ids: HashMap<String, usize>,
  /// Byline order.
  authors_of_paper: Vec<Vec<usize>>,
  /// Dataset order.
  papers_of_author: Vec<Vec<usize>>,
}

impl CrossRef {
  /// Builds the maps, enforcing unique identifiers and that every link is
  /// present on both sides and resolves.
  pub fn build(papers: &[Paper], authors: &[Author]) -> Result<Self, SchemaError> {
    let paper_ids = id_map(RecordKind::Paper, papers.iter().map(|p| p.paper_number.as_str()))?;
    let author_ids = id_map(RecordKind::Author, authors.iter().map(|a| a.id.as_str()))?;

    let mut authors_of_paper = Vec::with_capacity(papers.len());
    let mut papers_of_author = vec![Vec::new(); authors.len()];
    let mut paper_side: HashSet<(usize, usize)> = HashSet::new();

    for (p, paper) in papers.iter().enumerate() {
      let mut byline = Vec::with_capacity(paper.authors.len());
      for author_id in &paper.authors {
        let a = *author_ids
          .get(author_id)
          .ok_or_else(|| SchemaError::DanglingReference {
            from: RecordKind::Paper,
            id: paper.paper_number.clone(),
            to: RecordKind::Author,
            missing: author_id.clone(),
          })?;
        if paper_side.insert((p, a)) {
          byline.push(a);
          papers_of_author[a].push(p);
        }
      }
      authors_of_paper.push(byline);
    }

    let mut author_side: HashSet<(usize, usize)> = HashSet::new();
    for (a, author) in authors.iter().enumerate() {
      for entry in &author.papers {
        let p = *paper_ids
          .get(&entry.paper_number)
          .ok_or_else(|| SchemaError::DanglingReference {
            from: RecordKind::Author,
            id: author.id.clone(),
            to: RecordKind::Paper,
            missing: entry.paper_number.clone(),
          })?;
        if !paper_side.contains(&(p, a)) {
          return Err(SchemaError::AsymmetricLink {
            paper: entry.paper_number.clone(),
            author: author.id.clone(),
          });
        }
        author_side.insert((p, a));
      }
    }

    for (p, byline) in authors_of_paper.iter().enumerate() {
      if let Some(&a) = byline.iter().find(|&&a| !author_side.contains(&(p, a))) {
        return Err(SchemaError::AsymmetricLink {
          paper: papers[p].paper_number.clone(),
          author: authors[a].id.clone(),
        });
      }
    }

    Ok(Self {
      paper_ids,
      author_ids,
      authors_of_paper,
      papers_of_author,
    })
  }

  pub fn paper_position(&self, paper_number: &str) -> Option<usize> {
    self.paper_ids.get(paper_number).copied()
  }

  pub fn author_position(&self, author_id: &str) -> Option<usize> {
    self.author_ids.get(author_id).copied()
  }

  /// Positions of the authors of the paper at `paper`, in byline order.
  pub fn authors_of(&self, paper: usize) -> &[usize] {
    self.authors_of_paper.get(paper).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Positions of the papers of the author at `author`, in dataset order.
  pub fn papers_of(&self, author: usize) -> &[usize] {
    self.papers_of_author.get(author).map(Vec::as_slice).unwrap_or(&[])
  }

  /// All papers referencing `author_id`, in dataset order.
  pub fn papers_by_author<'a>(
    &self,
    papers: &'a [Paper],
    author_id: &str,
  ) -> Result<Vec<&'a Paper>, NotFoundError> {
    let a = self
      .author_position(author_id)
      .ok_or_else(|| NotFoundError::new(RecordKind::Author, author_id))?;
    Ok(self.papers_of(a).iter().map(|&p| &papers[p]).collect())
  }

  /// All authors of `paper_number`, in byline order.
  pub fn authors_by_paper<'a>(
    &self,
    authors: &'a [Author],
    paper_number: &str,
  ) -> Result<Vec<&'a Author>, NotFoundError> {
    let p = self
      .paper_position(paper_number)
      .ok_or_else(|| NotFoundError::new(RecordKind::Paper, paper_number))?;
    Ok(self.authors_of(p).iter().map(|&a| &authors[a]).collect())
  }
}

fn id_map<'a>(
  collection: RecordKind,
  ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>, SchemaError> {
  let mut map = HashMap::new();
  for (position, id) in ids.enumerate() {
    if map.insert(id.to_string(), position).is_some() {
      return Err(SchemaError::DuplicateId {
        collection,
        id: id.to_string(),
      });
    }
  }
  Ok(map)
}
