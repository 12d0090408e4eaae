//! Facet filters.
//!
//! A [`FilterSet`] is what the user selects: tracks, presentation types, a
//! date range and attendance modes. It compiles to a [`FilterExpr`] (an AND
//! across categories of ORs within a category) that is evaluated against the
//! [`Facets`] precomputed for each record at load time.

use crate::dataset::records::{AttendanceType, PresentationType};
use crate::error::QueryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A filterable record attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
  Track,
  Presentation,
  Date,
  Attendance,
}

/// A value a facet can take.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
  Date(NaiveDate),
  Text(String),
}

impl FilterValue {
  fn matches_eq(&self, other: &FilterValue) -> bool {
    match (self, other) {
      (FilterValue::Text(a), FilterValue::Text(b)) => a.eq_ignore_ascii_case(b),
      (FilterValue::Date(a), FilterValue::Date(b)) => a == b,
      _ => false,
    }
  }

  fn as_date(&self) -> Option<NaiveDate> {
    match self {
      FilterValue::Date(d) => Some(*d),
      FilterValue::Text(_) => None,
    }
  }
}

/// The comparison operators available to filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
  /// Equal to (`==`); text compares case-insensitively.
  Eq,
  /// Not equal to (`!=`)
  Ne,
}

/// A boolean filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
  /// True if some value of `facet` compares to `value` under `op`.
  Compare {
    facet: Facet,
    op: CompareOp,
    value: FilterValue,
  },
  /// True if some date of `facet` lies within `[start, end]`.
  ///
  /// Both bounds are inclusive and optional. A record without any date
  /// never satisfies a range.
  Within {
    facet: Facet,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  },
  /// True only if all sub-expressions are true.
  And(Vec<FilterExpr>),
  /// True if at least one sub-expression is true.
  Or(Vec<FilterExpr>),
  /// Inverts the sub-expression.
  Not(Box<FilterExpr>),
}

impl FilterExpr {
  /// Evaluates the expression against a record's facets.
  pub fn evaluate(&self, facets: &Facets) -> bool {
    match self {
      FilterExpr::Compare { facet, op, value } => {
        let found = facets.values(*facet).iter().any(|v| v.matches_eq(value));
        match op {
          CompareOp::Eq => found,
          CompareOp::Ne => !found,
        }
      }
      FilterExpr::Within { facet, start, end } => facets
        .values(*facet)
        .iter()
        .filter_map(FilterValue::as_date)
        .any(|d| start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e)),
      FilterExpr::And(exprs) => exprs.iter().all(|e| e.evaluate(facets)),
      FilterExpr::Or(exprs) => exprs.iter().any(|e| e.evaluate(facets)),
      FilterExpr::Not(expr) => !expr.evaluate(facets),
    }
  }
}

/// Facet values of one record.
///
/// A paper has at most one value per facet. An author carries the union of
/// the values of all their papers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
  pub track: Vec<FilterValue>,
  pub presentation: Vec<FilterValue>,
  pub date: Vec<FilterValue>,
  pub attendance: Vec<FilterValue>,
}

impl Facets {
  pub fn values(&self, facet: Facet) -> &[FilterValue] {
    match facet {
      Facet::Track => &self.track,
      Facet::Presentation => &self.presentation,
      Facet::Date => &self.date,
      Facet::Attendance => &self.attendance,
    }
  }

  /// Merges `other` into `self`, keeping each list sorted and unique.
  pub fn union(&mut self, other: &Facets) {
    for facet in [Facet::Track, Facet::Presentation, Facet::Date, Facet::Attendance] {
      let list = self.values_mut(facet);
      list.extend(other.values(facet).iter().cloned());
      list.sort();
      list.dedup();
    }
  }

  fn values_mut(&mut self, facet: Facet) -> &mut Vec<FilterValue> {
    match facet {
      Facet::Track => &mut self.track,
      Facet::Presentation => &mut self.presentation,
      Facet::Date => &mut self.date,
      Facet::Attendance => &mut self.attendance,
    }
  }
}

/// An optionally open-ended inclusive date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  #[serde(default)]
  pub start: Option<NaiveDate>,
  #[serde(default)]
  pub end: Option<NaiveDate>,
}

impl DateRange {
  pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
    Self { start, end }
  }

  /// A single day.
  pub fn on(day: NaiveDate) -> Self {
    Self::new(Some(day), Some(day))
  }
}

/// The user's facet selections.
///
/// Categories are ANDed; values selected within one category are ORed. An
/// empty set passes every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
  #[serde(default)]
  pub tracks: BTreeSet<String>,
  #[serde(default)]
  pub presentation_types: BTreeSet<PresentationType>,
  #[serde(default)]
  pub date_range: Option<DateRange>,
  #[serde(default)]
  pub attendance: BTreeSet<AttendanceType>,
}

impl FilterSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Selects one more track.
  pub fn track(mut self, track: impl Into<String>) -> Self {
    self.tracks.insert(track.into());
    self
  }

  /// Selects one more presentation type.
  pub fn presentation(mut self, kind: PresentationType) -> Self {
    self.presentation_types.insert(kind);
    self
  }

  /// Restricts session dates to `range`.
  pub fn dates(mut self, range: DateRange) -> Self {
    self.date_range = Some(range);
    self
  }

  /// Selects one more attendance mode.
  pub fn attendance(mut self, mode: AttendanceType) -> Self {
    self.attendance.insert(mode);
    self
  }

  /// Whether no category has a selection.
  pub fn is_empty(&self) -> bool {
    self.tracks.is_empty()
      && self.presentation_types.is_empty()
      && self.date_range.is_none()
      && self.attendance.is_empty()
  }

  /// Rejects combinations that cannot be evaluated meaningfully.
  pub fn validate(&self) -> Result<(), QueryError> {
    if let Some(DateRange {
      start: Some(start),
      end: Some(end),
    }) = self.date_range
    {
      if start > end {
        return Err(QueryError::InvalidDateRange { start, end });
      }
    }
    Ok(())
  }

  /// Compiles the selections into an expression; `None` when empty.
  pub fn to_expr(&self) -> Option<FilterExpr> {
    let mut clauses = Vec::new();

    if !self.tracks.is_empty() {
      clauses.push(any_of(
        Facet::Track,
        self.tracks.iter().map(|t| FilterValue::Text(t.trim().to_string())),
      ));
    }
    if !self.presentation_types.is_empty() {
      clauses.push(any_of(
        Facet::Presentation,
        self
          .presentation_types
          .iter()
          .map(|p| FilterValue::Text(p.label().to_string())),
      ));
    }
    if let Some(range) = self.date_range {
      clauses.push(FilterExpr::Within {
        facet: Facet::Date,
        start: range.start,
        end: range.end,
      });
    }
    if !self.attendance.is_empty() {
      // Selecting "unknown" matches nothing: unknown attendance has no facet value.
      clauses.push(any_of(
        Facet::Attendance,
        self
          .attendance
          .iter()
          .filter_map(|a| a.label())
          .map(|l| FilterValue::Text(l.to_string())),
      ));
    }

    match clauses.len() {
      0 => None,
      1 => clauses.pop(),
      _ => Some(FilterExpr::And(clauses)),
    }
  }

  /// Evaluates the filter set against one record's facets.
  pub fn matches(&self, facets: &Facets) -> bool {
    self.to_expr().map_or(true, |expr| expr.evaluate(facets))
  }
}

fn any_of(facet: Facet, values: impl Iterator<Item = FilterValue>) -> FilterExpr {
  FilterExpr::Or(
    values
      .map(|value| FilterExpr::Compare {
        facet,
        op: CompareOp::Eq,
        value,
      })
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
  }

  fn paper_facets(track: &str, kind: &str, date: Option<NaiveDate>) -> Facets {
    Facets {
      track: vec![FilterValue::Text(track.into())],
      presentation: vec![FilterValue::Text(kind.into())],
      date: date.into_iter().map(FilterValue::Date).collect(),
      attendance: vec![FilterValue::Text("in-person".into())],
    }
  }

  #[test]
  fn empty_set_passes_everything() {
    let filters = FilterSet::new();
    assert!(filters.is_empty());
    assert!(filters.matches(&Facets::default()));
  }

  #[test]
  fn or_within_category_and_across() {
    let facets = paper_facets("Findings", "poster", Some(day(29)));

    let tracks = FilterSet::new().track("Main").track("findings");
    assert!(tracks.matches(&facets));

    let both = tracks.clone().presentation(PresentationType::Oral);
    assert!(!both.matches(&facets));

    let poster = tracks.presentation(PresentationType::Poster);
    assert!(poster.matches(&facets));
  }

  #[test]
  fn date_range_bounds_are_inclusive() {
    let facets = paper_facets("Main", "oral", Some(day(29)));
    assert!(FilterSet::new().dates(DateRange::on(day(29))).matches(&facets));
    assert!(!FilterSet::new()
      .dates(DateRange::new(None, Some(day(28))))
      .matches(&facets));
    assert!(FilterSet::new()
      .dates(DateRange::new(Some(day(28)), None))
      .matches(&facets));

    let undated = paper_facets("Main", "oral", None);
    assert!(!FilterSet::new().dates(DateRange::on(day(29))).matches(&undated));
  }

  #[test]
  fn multi_valued_dates_need_one_date_inside_range() {
    let mut author = paper_facets("Main", "oral", Some(day(27)));
    author.union(&paper_facets("Main", "oral", Some(day(31))));
    assert_eq!(author.date.len(), 2);
    assert_eq!(author.track.len(), 1);

    let between = FilterSet::new().dates(DateRange::new(Some(day(28)), Some(day(30))));
    assert!(!between.matches(&author));
  }

  #[test]
  fn inverted_range_is_rejected() {
    let filters = FilterSet::new().dates(DateRange::new(Some(day(30)), Some(day(28))));
    assert_eq!(
      filters.validate(),
      Err(QueryError::InvalidDateRange {
        start: day(30),
        end: day(28)
      })
    );
  }

  #[test]
  fn not_and_ne_invert() {
    let facets = paper_facets("Main", "oral", None);
    let is_main = FilterExpr::Compare {
      facet: Facet::Track,
      op: CompareOp::Eq,
      value: FilterValue::Text("main".into()),
    };
    assert!(is_main.evaluate(&facets));
    assert!(!FilterExpr::Not(Box::new(is_main)).evaluate(&facets));
    let not_demo = FilterExpr::Compare {
      facet: Facet::Presentation,
      op: CompareOp::Ne,
      value: FilterValue::Text("demo".into()),
    };
    assert!(not_demo.evaluate(&facets));
  }

  #[test]
  fn filter_set_from_json() {
    let filters: FilterSet = serde_json::from_str(
      r#"{"tracks": ["Findings"], "presentation_types": ["poster"], "date_range": {"start": "2025-07-28"}}"#,
    )
    .unwrap();
    assert!(filters.tracks.contains("Findings"));
    assert_eq!(filters.date_range.unwrap().start, Some(day(28)));
    assert!(filters.validate().is_ok());
  }
}
