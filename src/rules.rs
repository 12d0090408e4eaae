//! Field rules DSL for configuring which record fields are indexed and how.

use serde::{Deserialize, Serialize};

/// Indexing rules for one collection.
///
/// Fields keep their insertion order so that index construction and tie
/// breaking between fields are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexRules {
    /// Field-level rules, by serialized field name.
    pub fields: Vec<(String, FieldRule)>,
}

impl IndexRules {
    /// Create a new rules builder.
    pub fn builder() -> IndexRulesBuilder {
        IndexRulesBuilder::default()
    }

    /// Default rules for papers: title highest, author names and abstract
    /// lower, the paper number favoured for exact matches.
    pub fn papers() -> Self {
        Self::builder()
            .field("paper_number", FieldRule::exact().fast_path().boost_exact())
            .field("title", FieldRule::fuzzy().weight(1.0).fast_path().boost_exact())
            .field("author_names", FieldRule::fuzzy().weight(0.7))
            .field("track", FieldRule::fuzzy().weight(0.5))
            .field("abstract", FieldRule::fuzzy().weight(0.4))
            .build()
    }

    /// Default rules for authors: name highest, affiliation lower.
    pub fn authors() -> Self {
        Self::builder()
            .field("id", FieldRule::exact().fast_path().boost_exact())
            .field("name", FieldRule::fuzzy().weight(1.0).fast_path().boost_exact())
            .field("affiliation", FieldRule::fuzzy().weight(0.4))
            .build()
    }

    /// Look up the rule for a field.
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }
}

/// Builder for index rules.
#[derive(Debug, Default)]
pub struct IndexRulesBuilder {
    fields: Vec<(String, FieldRule)>,
}

impl IndexRulesBuilder {
    /// Add a field rule. Adding a field twice replaces the earlier rule.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rule,
            None => self.fields.push((name, rule)),
        }
        self
    }

    /// Build the index rules.
    pub fn build(self) -> IndexRules {
        IndexRules {
            fields: self.fields,
        }
    }
}

/// Rule for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Matching strategy.
    pub matcher: Matcher,
    /// Relative weight of this field (higher = more important).
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Whether short queries are matched against this field.
    #[serde(default)]
    pub fast_path: bool,
    /// Whether a whole-value match on this field ranks above fuzzy hits.
    #[serde(default)]
    pub boost_exact: bool,
}

fn default_weight() -> f32 {
    1.0
}

impl Default for FieldRule {
    fn default() -> Self {
        Self {
            matcher: Matcher::Fuzzy,
            weight: default_weight(),
            fast_path: false,
            boost_exact: false,
        }
    }
}

impl FieldRule {
    /// Create a new field rule with the given matcher.
    pub fn new(matcher: Matcher) -> Self {
        Self {
            matcher,
            ..Default::default()
        }
    }

    /// Create an exact match rule.
    pub fn exact() -> Self {
        Self::new(Matcher::Exact)
    }

    /// Create a fuzzy rule.
    pub fn fuzzy() -> Self {
        Self::new(Matcher::Fuzzy)
    }

    /// Set the weight. Non-positive weights are clamped to a small epsilon.
    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(f32::EPSILON);
        self
    }

    /// Consult this field for short queries.
    pub fn fast_path(mut self) -> Self {
        self.fast_path = true;
        self
    }

    /// Rank whole-value matches on this field above fuzzy hits.
    pub fn boost_exact(mut self) -> Self {
        self.boost_exact = true;
        self
    }
}

/// Matching strategy for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matcher {
    /// Terms match only when identical (case- and accent-insensitive).
    Exact,
    /// Terms match exactly, by prefix, or within a small edit distance.
    Fuzzy,
}
