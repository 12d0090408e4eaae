//! Paper and author records as they appear in the dataset snapshot.
//!
//! Field names follow the JSON exported by the conference data pipeline.
//! Optional text fields exported as empty strings are read as absent.

use crate::index::tokenizer::fold;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// Date format used by `session_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A conference paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
  /// Unique paper number.
  #[serde(alias = "id", deserialize_with = "id_string")]
  pub paper_number: String,
  pub title: String,
  #[serde(rename = "abstract", default)]
  pub abstract_text: String,
  /// Author identifiers in byline order.
  #[serde(default)]
  pub authors: Vec<String>,
  /// Track or workshop label, e.g. "Main" or "Findings".
  #[serde(default, deserialize_with = "blank_as_none")]
  pub track: Option<String>,
  #[serde(default)]
  pub presentation_type: PresentationType,
  #[serde(default, alias = "attendance_type")]
  pub attendance: AttendanceType,
  /// Presenter as typed in the registration sheet; free text.
  #[serde(default, deserialize_with = "blank_as_none")]
  pub presenter_name: Option<String>,
  #[serde(flatten)]
  pub schedule: Schedule,
  /// External reference link (anthology page or PDF).
  #[serde(default, deserialize_with = "blank_as_none")]
  pub url: Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub doi: Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub bibkey: Option<String>,
}

impl Paper {
  /// The parsed session date, if the paper is scheduled.
  pub fn session_date(&self) -> Option<NaiveDate> {
    self.schedule.date()
  }

  /// Truncates the abstract to at most `max_chars` characters for display.
  ///
  /// Truncated text ends with an ellipsis; short abstracts are borrowed as is.
  pub fn abstract_preview(&self, max_chars: usize) -> Cow<'_, str> {
    let text = self.abstract_text.trim();
    match text.char_indices().nth(max_chars) {
      None => Cow::Borrowed(text),
      Some((cut, _)) => Cow::Owned(format!("{}…", text[..cut].trim_end())),
    }
  }
}

/// Scheduling metadata of a paper. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
  #[serde(default, deserialize_with = "blank_as_none")]
  pub session: Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub session_title: Option<String>,
  /// Subdivision of a parallel session, e.g. "ML 2".
  #[serde(default, deserialize_with = "blank_as_none")]
  pub sub_session: Option<String>,
  /// `YYYY-MM-DD`; validated when the dataset is loaded.
  #[serde(default, deserialize_with = "blank_as_none")]
  pub session_date: Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub session_time: Option<String>,
  #[serde(default, alias = "room_location", deserialize_with = "blank_as_none")]
  pub room: Option<String>,
  /// Poster hall.
  #[serde(default, alias = "poster_hall", deserialize_with = "blank_as_none")]
  pub hall: Option<String>,
  /// Poster board number.
  #[serde(default, alias = "poster_board", deserialize_with = "blank_as_none")]
  pub board_number: Option<String>,
}

impl Schedule {
  /// Parses `session_date`, returning `None` when absent or unparseable.
  pub fn date(&self) -> Option<NaiveDate> {
    self
      .session_date
      .as_deref()
      .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
  }
}

/// How a paper is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationType {
  #[serde(alias = "Oral", alias = "ORAL", alias = "talk")]
  Oral,
  #[serde(alias = "Poster", alias = "POSTER")]
  Poster,
  #[serde(alias = "Demo", alias = "DEMO", alias = "demonstration")]
  Demo,
  #[default]
  #[serde(other)]
  Other,
}

impl PresentationType {
  /// Stable lowercase label used for facets.
  pub fn label(self) -> &'static str {
    match self {
      PresentationType::Oral => "oral",
      PresentationType::Poster => "poster",
      PresentationType::Demo => "demo",
      PresentationType::Other => "other",
    }
  }
}

/// Whether the presenter attends on site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttendanceType {
  #[serde(
    rename = "in-person",
    alias = "In-Person",
    alias = "In-person",
    alias = "In Person",
    alias = "in person",
    alias = "in_person"
  )]
  InPerson,
  #[serde(rename = "virtual", alias = "Virtual", alias = "remote", alias = "Remote")]
  Virtual,
  #[default]
  #[serde(rename = "unknown", other)]
  Unknown,
}

impl AttendanceType {
  /// Stable lowercase label used for facets; `None` when unknown.
  pub fn label(self) -> Option<&'static str> {
    match self {
      AttendanceType::InPerson => Some("in-person"),
      AttendanceType::Virtual => Some("virtual"),
      AttendanceType::Unknown => None,
    }
  }
}

/// A paper author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
  #[serde(alias = "author_id", deserialize_with = "id_string")]
  pub id: String,
  pub name: String,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub affiliation: Option<String>,
  /// Papers this author contributed to.
  #[serde(default)]
  pub papers: Vec<AuthoredPaper>,
}

impl Author {
  /// URL-friendly slug derived from the family name.
  ///
  /// Diacritics are folded, anything but ASCII letters, digits and spaces
  /// is dropped, and spaces become hyphens.
  pub fn slug(&self) -> String {
    let last = self.name.split_whitespace().last().unwrap_or_default();
    let folded = fold(last).to_lowercase();
    let kept: String = folded
      .chars()
      .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
      .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
  }

  /// Whether this author presents `paper_number`.
  pub fn presents(&self, paper_number: &str) -> bool {
    self
      .papers
      .iter()
      .any(|p| p.paper_number == paper_number && p.presenter)
  }
}

/// An author's link to one paper.
///
/// Accepts either a bare paper number or an object with `paper_number`
/// and an optional `presenter` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AuthoredPaperRepr")]
pub struct AuthoredPaper {
  pub paper_number: String,
  #[serde(default)]
  pub presenter: bool,
}

impl AuthoredPaper {
  pub fn new(paper_number: impl Into<String>) -> Self {
    Self {
      paper_number: paper_number.into(),
      presenter: false,
    }
  }

  pub fn presenting(paper_number: impl Into<String>) -> Self {
    Self {
      paper_number: paper_number.into(),
      presenter: true,
    }
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthoredPaperRepr {
  Id(String),
  Number(u64),
  Entry {
    #[serde(alias = "id", deserialize_with = "id_string")]
    paper_number: String,
    #[serde(default)]
    presenter: bool,
  },
}

impl From<AuthoredPaperRepr> for AuthoredPaper {
  fn from(repr: AuthoredPaperRepr) -> Self {
    match repr {
      AuthoredPaperRepr::Id(id) => AuthoredPaper::new(id),
      AuthoredPaperRepr::Number(n) => AuthoredPaper::new(n.to_string()),
      AuthoredPaperRepr::Entry {
        paper_number,
        presenter,
      } => AuthoredPaper {
        paper_number,
        presenter,
      },
    }
  }
}

/// Both collections delivered together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
  pub papers: Vec<Paper>,
  pub authors: Vec<Author>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<String>::deserialize(deserializer)?;
  Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Identifiers are strings, but spreadsheets export paper numbers as integers.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Id {
    Text(String),
    Number(u64),
  }

  Ok(match Id::deserialize(deserializer)? {
    Id::Text(s) => s.trim().to_string(),
    Id::Number(n) => n.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn paper_reads_pipeline_export() {
    let paper: Paper = serde_json::from_value(json!({
      "paper_number": 142,
      "title": "Sparse Attention Revisited",
      "abstract": "We revisit sparse attention.",
      "authors": ["a-1", "a-2"],
      "track": "Findings",
      "presentation_type": "Poster",
      "attendance_type": "In-Person",
      "session": "Poster 3",
      "session_date": "2025-07-29",
      "session_time": "",
      "room_location": "Hall X",
      "url": ""
    }))
    .unwrap();

    assert_eq!(paper.paper_number, "142");
    assert_eq!(paper.presentation_type, PresentationType::Poster);
    assert_eq!(paper.attendance, AttendanceType::InPerson);
    assert_eq!(paper.schedule.room.as_deref(), Some("Hall X"));
    assert_eq!(paper.schedule.session_time, None);
    assert_eq!(paper.url, None);
    assert_eq!(paper.session_date(), NaiveDate::from_ymd_opt(2025, 7, 29));
  }

  #[test]
  fn paper_reads_poster_board_import() {
    let paper: Paper = serde_json::from_value(json!({
      "paper_number": "88",
      "title": "Robust Parsing",
      "presenter_name": "Mei Tanaka",
      "session": "Poster 3",
      "sub_session": "ML 2",
      "poster_hall": "Hall X",
      "poster_board": "42",
      "session_time": "14:00"
    }))
    .unwrap();

    assert_eq!(paper.presenter_name.as_deref(), Some("Mei Tanaka"));
    assert_eq!(paper.schedule.sub_session.as_deref(), Some("ML 2"));
    assert_eq!(paper.schedule.hall.as_deref(), Some("Hall X"));
    assert_eq!(paper.schedule.board_number.as_deref(), Some("42"));
    assert_eq!(paper.schedule.session_time.as_deref(), Some("14:00"));
  }

  #[test]
  fn unknown_presentation_type_is_other() {
    let paper: Paper = serde_json::from_value(json!({
      "paper_number": "7",
      "title": "T",
      "presentation_type": "Lightning talk"
    }))
    .unwrap();
    assert_eq!(paper.presentation_type, PresentationType::Other);
    assert_eq!(paper.attendance, AttendanceType::Unknown);
  }

  #[test]
  fn authored_papers_accept_both_shapes() {
    let author: Author = serde_json::from_value(json!({
      "id": "a-1",
      "name": "Zoë Müller",
      "papers": ["12", {"paper_number": "13", "title": "x", "presenter": true}, 14]
    }))
    .unwrap();

    assert_eq!(author.papers.len(), 3);
    assert!(!author.papers[0].presenter);
    assert!(author.presents("13"));
    assert_eq!(author.papers[2].paper_number, "14");
    assert_eq!(author.slug(), "mueller");
  }

  #[test]
  fn abstract_preview_truncates_on_char_boundary() {
    let mut paper: Paper = serde_json::from_value(json!({"paper_number": "1", "title": "t"})).unwrap();
    paper.abstract_text = "Ünïcödé text here".to_string();
    assert_eq!(paper.abstract_preview(7), "Ünïcödé…");
    assert_eq!(paper.abstract_preview(100), "Ünïcödé text here");
  }
}
