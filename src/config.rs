//! Engine configuration.

use crate::error::ConfigError;
use crate::rules::IndexRules;
use crate::types::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Where the facet filter is applied relative to text scoring.
///
/// Both positions produce identical pages; filtering first only scores
/// fewer records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
  /// Narrow the candidate pool, then score.
  #[default]
  BeforeScoring,
  /// Score everything, then drop records failing the filter.
  AfterScoring,
}

/// Tunables for indexing, querying and input debouncing.
///
/// Every field has a default, so a partial JSON document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Page size used by [`crate::engine::Catalog::query`] states that do
  /// not choose one.
  pub page_size: usize,
  /// Trimmed queries of at most this many characters take the prefix fast
  /// path instead of fuzzy scoring.
  pub short_query_max_chars: usize,
  /// Upper bound on the edits tolerated per query term.
  pub max_edit_distance: usize,
  /// Where facet filters run.
  pub filter_stage: FilterStage,
  /// Quiet window before a burst of query changes triggers a search.
  pub debounce_ms: u64,
  /// Length of abstract previews, in characters.
  pub abstract_preview_chars: usize,
  /// Indexed paper fields.
  pub paper_rules: IndexRules,
  /// Indexed author fields.
  pub author_rules: IndexRules,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
      short_query_max_chars: 2,
      max_edit_distance: 2,
      filter_stage: FilterStage::default(),
      debounce_ms: 200,
      abstract_preview_chars: 300,
      paper_rules: IndexRules::papers(),
      author_rules: IndexRules::authors(),
    }
  }
}

impl EngineConfig {
  /// Parses a JSON configuration document.
  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
  }

  /// Reads a JSON configuration file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| ConfigError::Io {
      path: path.display().to_string(),
      message: e.to_string(),
    })?;
    Self::from_json_str(&json)
  }

  /// The debounce quiet window.
  pub fn debounce_window(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  /// Sets the default page size.
  pub fn page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size;
    self
  }

  /// Sets the short-query threshold.
  pub fn short_query_max_chars(mut self, chars: usize) -> Self {
    self.short_query_max_chars = chars;
    self
  }

  /// Sets the maximum edit distance.
  pub fn max_edit_distance(mut self, edits: usize) -> Self {
    self.max_edit_distance = edits;
    self
  }

  /// Sets where filters are applied.
  pub fn filter_stage(mut self, stage: FilterStage) -> Self {
    self.filter_stage = stage;
    self
  }

  /// Sets the debounce window in milliseconds.
  pub fn debounce_ms(mut self, ms: u64) -> Self {
    self.debounce_ms = ms;
    self
  }

  /// Replaces the paper indexing rules.
  pub fn paper_rules(mut self, rules: IndexRules) -> Self {
    self.paper_rules = rules;
    self
  }

  /// Replaces the author indexing rules.
  pub fn author_rules(mut self, rules: IndexRules) -> Self {
    self.author_rules = rules;
    self
  }
}
