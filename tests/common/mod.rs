#![allow(dead_code)]

use confsearch::prelude::*;
use serde_json::json;

/// Three papers and two authors: P1 by A1, P2 by A1 and A2, P3 by A2.
pub fn snapshot() -> serde_json::Value {
  json!({
    "papers": [
      {
        "paper_number": "P1",
        "title": "Alpha Retrieval with Sparse Indexes",
        "abstract": "We study sparse retrieval for question answering.",
        "authors": ["A1"],
        "track": "Main",
        "presentation_type": "Oral",
        "attendance_type": "In-Person",
        "session_date": "2025-07-28",
        "room_location": "Hall A"
      },
      {
        "paper_number": "P2",
        "title": "Beta Testing Neural Parsers",
        "abstract": "An evaluation of dependency parsers under noise.",
        "authors": ["A1", "A2"],
        "track": "Findings",
        "presentation_type": "Poster",
        "attendance_type": "Virtual",
        "session_date": "2025-07-29",
        "board_number": "17"
      },
      {
        "paper_number": "P3",
        "title": "Gamma Ray Translation",
        "abstract": "",
        "authors": ["A2"],
        "track": "Main",
        "presentation_type": "Poster",
        "session_date": ""
      }
    ],
    "authors": [
      {
        "id": "A1",
        "name": "José Núñez",
        "affiliation": "Universidad de Chile",
        "papers": [{"paper_number": "P1", "presenter": true}, "P2"]
      },
      {
        "id": "A2",
        "name": "Grete Schäfer",
        "affiliation": "",
        "papers": [{"paper_number": "P2", "presenter": true}, "P3"]
      }
    ]
  })
}

pub fn dataset() -> Dataset {
  Dataset::from_snapshot_json(&snapshot().to_string()).unwrap()
}

pub fn catalog() -> Catalog {
  Catalog::new(dataset(), EngineConfig::default())
}

pub fn paper_ids(page: &Page<SearchHit<'_, Paper>>) -> Vec<String> {
  page
    .items
    .iter()
    .map(|h| h.record.paper_number.clone())
    .collect()
}

pub fn author_ids(page: &Page<SearchHit<'_, Author>>) -> Vec<String> {
  page.items.iter().map(|h| h.record.id.clone()).collect()
}
