mod common;

use common::{catalog, snapshot};
use confsearch::prelude::*;

fn titles(papers: &[&Paper]) -> Vec<String> {
  papers.iter().map(|p| p.title.clone()).collect()
}

#[test]
fn test_papers_by_author_in_dataset_order() {
  let catalog = catalog();
  let papers = catalog.papers_by_author("A1").unwrap();
  assert_eq!(
    titles(&papers),
    vec!["Alpha Retrieval with Sparse Indexes", "Beta Testing Neural Parsers"]
  );
}

#[test]
fn test_authors_by_paper_in_byline_order() {
  let catalog = catalog();
  let ids: Vec<&str> = catalog
    .authors_by_paper("P2")
    .unwrap()
    .iter()
    .map(|a| a.id.as_str())
    .collect();
  assert_eq!(ids, vec!["A1", "A2"]);
}

#[test]
fn test_links_resolve_both_ways() {
  let catalog = catalog();
  for author in catalog.dataset().authors() {
    for paper in catalog.papers_by_author(&author.id).unwrap() {
      let back = catalog.authors_by_paper(&paper.paper_number).unwrap();
      assert!(back.iter().any(|a| a.id == author.id));
    }
  }
  for paper in catalog.dataset().papers() {
    for author in catalog.authors_by_paper(&paper.paper_number).unwrap() {
      let back = catalog.papers_by_author(&author.id).unwrap();
      assert!(back.iter().any(|p| p.paper_number == paper.paper_number));
    }
  }
}

#[test]
fn test_unknown_ids_are_not_found() {
  let catalog = catalog();
  assert_eq!(
    catalog.papers_by_author("A9").unwrap_err(),
    NotFoundError::new(RecordKind::Author, "A9")
  );
  assert_eq!(
    catalog.authors_by_paper("P9").unwrap_err(),
    NotFoundError::new(RecordKind::Paper, "P9")
  );
  assert!(catalog.paper("P9").is_err());
  assert_eq!(catalog.author("A2").unwrap().slug(), "schaefer");
}

#[test]
fn test_presenters() {
  let catalog = catalog();
  let presenters = catalog.presenters("P2").unwrap();
  assert_eq!(presenters.len(), 1);
  assert_eq!(presenters[0].id, "A2");
  assert!(catalog.presenters("P3").unwrap().is_empty());
}

#[test]
fn test_optional_fields_are_normalized() {
  let catalog = catalog();
  let p3 = catalog.paper("P3").unwrap();
  assert_eq!(p3.schedule.session_date, None);
  assert_eq!(p3.session_date(), None);
  assert_eq!(p3.attendance, AttendanceType::Unknown);
  assert_eq!(catalog.author("A2").unwrap().affiliation, None);

  let p1 = catalog.paper("P1").unwrap();
  assert_eq!(p1.schedule.room.as_deref(), Some("Hall A"));
  assert_eq!(p1.presentation_type, PresentationType::Oral);
  assert_eq!(p1.abstract_preview(9), "We study…");
}

#[test]
fn test_asymmetric_link_is_rejected() {
  let mut snapshot = snapshot();
  snapshot["authors"][1]["papers"] = serde_json::json!(["P3"]);
  let err = Dataset::from_snapshot_json(&snapshot.to_string()).unwrap_err();
  assert_eq!(
    err,
    SchemaError::AsymmetricLink {
      paper: "P2".into(),
      author: "A2".into()
    }
  );
}

#[test]
fn test_dangling_reference_is_rejected() {
  let mut snapshot = snapshot();
  snapshot["papers"][2]["authors"] = serde_json::json!(["A2", "A7"]);
  let err = Dataset::from_snapshot_json(&snapshot.to_string()).unwrap_err();
  assert_eq!(
    err,
    SchemaError::DanglingReference {
      from: RecordKind::Paper,
      id: "P3".into(),
      to: RecordKind::Author,
      missing: "A7".into()
    }
  );
}

#[test]
fn test_duplicate_and_malformed_records_are_rejected() {
  let mut snapshot = snapshot();
  snapshot["papers"][2]["paper_number"] = "P1".into();
  assert!(matches!(
    Dataset::from_snapshot_json(&snapshot.to_string()),
    Err(SchemaError::DuplicateId { .. })
  ));

  let err = Dataset::from_json("[{\"title\": 3}]", "[]").unwrap_err();
  assert!(matches!(
    err,
    SchemaError::Malformed {
      collection: RecordKind::Paper,
      ..
    }
  ));

  let mut snapshot = common::snapshot();
  snapshot["papers"][0]["session_date"] = "28/07/2025".into();
  assert!(matches!(
    Dataset::from_snapshot_json(&snapshot.to_string()),
    Err(SchemaError::InvalidDate { .. })
  ));
}

#[test]
fn test_missing_file_is_io_error() {
  let err = Dataset::from_snapshot_path("/nonexistent/snapshot.json").unwrap_err();
  assert!(matches!(err, SchemaError::Io { .. }));
  let err: Error = err.into();
  assert!(err.to_string().contains("/nonexistent/snapshot.json"));
}
