//! The query engine and the catalog facade that owns the loaded data.

use crate::config::{EngineConfig, FilterStage};
use crate::context::SearchContext;
use crate::dataset::records::{Author, Paper};
use crate::dataset::Dataset;
use crate::error::{NotFoundError, QueryError, SchemaError};
use crate::filter::{Facet, Facets, FilterValue};
use crate::index::SearchIndex;
use crate::searcher::{ScoredDoc, Searcher};
use crate::searchers::{FuzzySearch, PrefixSearch};
use crate::types::{Page, QueryState, SearchHit, SearcherKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A record collection as seen by the engine: records, their facets and
/// their index, all aligned by position.
#[derive(Debug)]
pub struct Corpus<'a, T> {
  records: &'a [T],
  facets: &'a [Facets],
  index: &'a SearchIndex,
}

impl<T> Clone for Corpus<'_, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Corpus<'_, T> {}

impl<'a, T> Corpus<'a, T> {
  /// Pairs records with their facets and index.
  ///
  /// # Errors
  ///
  /// [`SchemaError::Misaligned`] unless all three have one entry per record.
  pub fn new(records: &'a [T], facets: &'a [Facets], index: &'a SearchIndex) -> Result<Self, SchemaError> {
    if facets.len() != records.len() || index.len() != records.len() {
      return Err(SchemaError::Misaligned {
        records: records.len(),
        facets: facets.len(),
        indexed: index.len(),
      });
    }
    Ok(Self::aligned(records, facets, index))
  }

  /// For parts built together from one dataset.
  fn aligned(records: &'a [T], facets: &'a [Facets], index: &'a SearchIndex) -> Self {
    Self {
      records,
      facets,
      index,
    }
  }

  pub fn records(&self) -> &'a [T] {
    self.records
  }

  pub fn facets(&self) -> &'a [Facets] {
    self.facets
  }

  pub fn index(&self) -> &'a SearchIndex {
    self.index
  }
}

/// Turns a [`QueryState`] into a ranked page of hits.
///
/// ## Search Lifecycle
///
/// 1.  **Validation**: page, page size and filters are checked; problems
///     are returned as a [`QueryError`], never as an empty page.
/// 2.  **Filter mask**: the filter set is compiled and evaluated once per
///     record.
/// 3.  **Strategy**: an empty query browses every record; a query of at most
///     `short_query_max_chars` characters runs [`PrefixSearch`]; anything
///     longer runs [`FuzzySearch`].
/// 4.  **Filtering**: the mask narrows the candidates before scoring or
///     discards hits after scoring, depending on [`FilterStage`]. Scores
///     never depend on other records, so both give the same result.
/// 5.  **Ranking**: exact hits first, then ascending distance, then
///     collection order.
/// 6.  **Pagination**: a pure slice of the ranked list.
#[derive(Debug, Clone)]
pub struct QueryEngine {
  short_query_max_chars: usize,
  max_edit_distance: usize,
  filter_stage: FilterStage,
  prefix: PrefixSearch,
  fuzzy: FuzzySearch,
}

impl Default for QueryEngine {
  fn default() -> Self {
    Self::new(&EngineConfig::default())
  }
}

impl QueryEngine {
  pub fn new(config: &EngineConfig) -> Self {
    Self {
      short_query_max_chars: config.short_query_max_chars,
      max_edit_distance: config.max_edit_distance,
      filter_stage: config.filter_stage,
      prefix: PrefixSearch::new(),
      fuzzy: FuzzySearch::new(),
    }
  }

  /// Overrides where filters are applied.
  pub fn with_filter_stage(mut self, stage: FilterStage) -> Self {
    self.filter_stage = stage;
    self
  }

  /// Picks the strategy for a trimmed query; `None` means browse.
  fn searcher_for(&self, query: &str) -> Option<&dyn Searcher> {
    if query.is_empty() {
      None
    } else if query.chars().count() <= self.short_query_max_chars {
      Some(&self.prefix)
    } else {
      Some(&self.fuzzy)
    }
  }

  /// Runs one search.
  ///
  /// # Errors
  ///
  /// [`QueryError`] if the page is 0, the page size is 0, or the date range
  /// is inverted.
  pub fn search<'a, T>(
    &self,
    corpus: &Corpus<'a, T>,
    state: &QueryState,
  ) -> Result<Page<SearchHit<'a, T>>, QueryError> {
    if state.page == 0 {
      return Err(QueryError::InvalidPage);
    }
    if state.page_size == 0 {
      return Err(QueryError::InvalidPageSize);
    }
    state.filters.validate()?;

    let mask: Option<Vec<bool>> = state
      .filters
      .to_expr()
      .map(|expr| corpus.facets.iter().map(|f| expr.evaluate(f)).collect());
    let passes = |doc: usize| {
      mask
        .as_ref()
        .map_or(true, |m| m.get(doc).copied().unwrap_or(false))
    };

    let query = state.query.trim();
    let (kind, mut ranked) = match self.searcher_for(query) {
      None => {
        let all: Vec<ScoredDoc> = (0..corpus.records.len())
          .filter(|&doc| passes(doc))
          .map(|doc| ScoredDoc {
            doc,
            distance: 0.0,
            exact: false,
            details: Vec::new(),
          })
          .collect();
        (SearcherKind::Browse, all)
      }
      Some(searcher) => {
        let mut context =
          SearchContext::new(corpus.index).with_max_edit_distance(self.max_edit_distance);
        if let (FilterStage::BeforeScoring, Some(mask)) = (self.filter_stage, mask.as_deref()) {
          context = context.with_candidates(mask);
        }

        let mut scored = searcher.search(&context, query);
        if self.filter_stage == FilterStage::AfterScoring {
          scored.retain(|s| passes(s.doc));
        }
        (searcher.kind(), scored)
      }
    };

    ranked.sort_by(ScoredDoc::rank_cmp);

    debug!(
      query,
      strategy = ?kind,
      total = ranked.len(),
      page = state.page,
      "search complete"
    );

    let page = Page::slice(ranked, state.page, state.page_size);
    Ok(page.map(|s| SearchHit {
      record: &corpus.records[s.doc],
      position: s.doc,
      distance: s.distance,
      exact: s.exact,
      strategy: kind,
      details: s.details,
    }))
  }
}

/// The shape papers are indexed in: the record plus its author names.
#[derive(Serialize)]
struct PaperDocument<'a> {
  #[serde(flatten)]
  paper: &'a Paper,
  author_names: Vec<&'a str>,
}

/// How many papers carry a facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
  pub value: FilterValue,
  pub count: usize,
}

/// The loaded dataset together with its search indexes.
///
/// This is the in-process surface consumed by the presentation layer:
/// paginated searches over papers and authors, cross-reference lookups
/// and facet listings. Everything is read-only after construction.
///
/// # Examples
///
/// ```rust
/// use confsearch::prelude::*;
///
/// let papers = r#"[
///   {"paper_number": "1", "title": "Attention Is All You Need", "authors": ["vaswani"], "track": "Main"},
///   {"paper_number": "2", "title": "Deep Residual Learning", "authors": ["he"], "track": "Findings"}
/// ]"#;
/// let authors = r#"[
///   {"id": "vaswani", "name": "Ashish Vaswani", "papers": ["1"]},
///   {"id": "he", "name": "Kaiming He", "papers": ["2"]}
/// ]"#;
///
/// let dataset = Dataset::from_json(papers, authors).unwrap();
/// let catalog = Catalog::new(dataset, EngineConfig::default());
///
/// let page = catalog.search_papers(&QueryState::new("atention")).unwrap();
/// assert_eq!(page.items[0].record.paper_number, "1");
///
/// let mine = catalog.papers_by_author("he").unwrap();
/// assert_eq!(mine[0].title, "Deep Residual Learning");
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
  dataset: Dataset,
  paper_index: SearchIndex,
  author_index: SearchIndex,
  engine: QueryEngine,
  config: EngineConfig,
}

impl Catalog {
  /// Builds both indexes. Called once per process.
  pub fn new(dataset: Dataset, config: EngineConfig) -> Self {
    let documents: Vec<PaperDocument<'_>> = dataset
      .papers()
      .iter()
      .enumerate()
      .map(|(p, paper)| PaperDocument {
        paper,
        author_names: dataset
          .xref()
          .authors_of(p)
          .iter()
          .map(|&a| dataset.authors()[a].name.as_str())
          .collect(),
      })
      .collect();

    let paper_index = SearchIndex::build(&documents, &config.paper_rules);
    let author_index = SearchIndex::build(dataset.authors(), &config.author_rules);
    let engine = QueryEngine::new(&config);

    info!(
      paper_terms = paper_index.terms().len(),
      author_terms = author_index.terms().len(),
      "catalog ready"
    );

    Self {
      dataset,
      paper_index,
      author_index,
      engine,
      config,
    }
  }

  pub fn dataset(&self) -> &Dataset {
    &self.dataset
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  pub fn engine(&self) -> &QueryEngine {
    &self.engine
  }

  /// A first-page state for `query` using the configured page size.
  pub fn query(&self, query: impl Into<String>) -> QueryState {
    QueryState::builder()
      .query(query)
      .page_size(self.config.page_size)
      .build()
  }

  pub fn papers(&self) -> Corpus<'_, Paper> {
    Corpus::aligned(self.dataset.papers(), self.dataset.paper_facets(), &self.paper_index)
  }

  pub fn authors(&self) -> Corpus<'_, Author> {
    Corpus::aligned(self.dataset.authors(), self.dataset.author_facets(), &self.author_index)
  }

  /// Searches papers.
  pub fn search_papers(&self, state: &QueryState) -> Result<Page<SearchHit<'_, Paper>>, QueryError> {
    self.engine.search(&self.papers(), state)
  }

  /// Searches authors. Facet filters apply to the union of each author's
  /// papers.
  pub fn search_authors(&self, state: &QueryState) -> Result<Page<SearchHit<'_, Author>>, QueryError> {
    self.engine.search(&self.authors(), state)
  }

  pub fn paper(&self, paper_number: &str) -> Result<&Paper, NotFoundError> {
    self.dataset.paper(paper_number)
  }

  pub fn author(&self, author_id: &str) -> Result<&Author, NotFoundError> {
    self.dataset.author(author_id)
  }

  /// Papers of an author, in dataset order.
  pub fn papers_by_author(&self, author_id: &str) -> Result<Vec<&Paper>, NotFoundError> {
    self.dataset.papers_by_author(author_id)
  }

  /// Authors of a paper, in byline order.
  pub fn authors_by_paper(&self, paper_number: &str) -> Result<Vec<&Author>, NotFoundError> {
    self.dataset.authors_by_paper(paper_number)
  }

  /// Authors flagged as presenting `paper_number`, in byline order.
  pub fn presenters(&self, paper_number: &str) -> Result<Vec<&Author>, NotFoundError> {
    Ok(
      self
        .authors_by_paper(paper_number)?
        .into_iter()
        .filter(|a| a.presents(paper_number))
        .collect(),
    )
  }

  /// Distinct values of `facet` over all papers, with paper counts.
  ///
  /// Sorted by value; dates chronologically.
  pub fn facet_values(&self, facet: Facet) -> Vec<FacetCount> {
    let mut counts: BTreeMap<&FilterValue, usize> = BTreeMap::new();
    for facets in self.dataset.paper_facets() {
      for value in facets.values(facet) {
        *counts.entry(value).or_insert(0) += 1;
      }
    }
    counts
      .into_iter()
      .map(|(value, count)| FacetCount {
        value: value.clone(),
        count,
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::records::PresentationType;
  use crate::filter::{DateRange, FilterSet};
  use chrono::NaiveDate;

  const PAPERS: &str = r#"[
    {"paper_number": "10", "title": "Neural Machine Translation", "authors": ["a1"], "track": "Main",
     "presentation_type": "oral", "session_date": "2025-07-28"},
    {"paper_number": "11", "title": "Parsing with Transformers", "authors": ["a1", "a2"], "track": "Findings",
     "presentation_type": "poster", "session_date": "2025-07-29"},
    {"paper_number": "12", "title": "Neural Parsing", "authors": ["a2"], "track": "Main",
     "presentation_type": "poster"}
  ]"#;

  const AUTHORS: &str = r#"[
    {"id": "a1", "name": "Ana Müller", "papers": [{"paper_number": "10", "presenter": true}, "11"]},
    {"id": "a2", "name": "Bo Chen", "papers": ["11", {"paper_number": "12", "presenter": true}]}
  ]"#;

  fn catalog() -> Catalog {
    Catalog::new(Dataset::from_json(PAPERS, AUTHORS).unwrap(), EngineConfig::default())
  }

  fn numbers<'a>(page: &'a Page<SearchHit<'a, Paper>>) -> Vec<&'a str> {
    page.items.iter().map(|h| h.record.paper_number.as_str()).collect()
  }

  #[test]
  fn empty_query_browses_in_order() {
    let catalog = catalog();
    let page = catalog.search_papers(&QueryState::new("  ")).unwrap();
    assert_eq!(numbers(&page), vec!["10", "11", "12"]);
    assert!(page.items.iter().all(|h| h.strategy == SearcherKind::Browse));
  }

  #[test]
  fn fuzzy_query_ranks_exact_title_first() {
    let catalog = catalog();
    let page = catalog.search_papers(&QueryState::new("neural parsing")).unwrap();
    assert_eq!(numbers(&page), vec!["12"]);
    assert!(page.items[0].exact);

    let page = catalog.search_papers(&QueryState::new("nueral")).unwrap();
    assert_eq!(numbers(&page), vec!["10", "12"]);
    assert_eq!(page.items[0].strategy, SearcherKind::Fuzzy);
  }

  #[test]
  fn author_names_are_searchable_on_papers() {
    let catalog = catalog();
    let page = catalog.search_papers(&QueryState::new("muller")).unwrap();
    assert_eq!(numbers(&page), vec!["10", "11"]);
  }

  #[test]
  fn short_query_uses_prefix() {
    let catalog = catalog();
    let page = catalog.search_papers(&QueryState::new("pa")).unwrap();
    assert_eq!(numbers(&page), vec!["11"]);
    assert_eq!(page.items[0].strategy, SearcherKind::Prefix);

    let page = catalog.search_papers(&QueryState::new("11")).unwrap();
    assert!(page.items[0].exact);
  }

  #[test]
  fn filter_stages_agree() {
    let catalog = catalog();
    let filters = FilterSet::new().presentation(PresentationType::Poster);
    let before = QueryEngine::new(catalog.config()).with_filter_stage(FilterStage::BeforeScoring);
    let after = QueryEngine::new(catalog.config()).with_filter_stage(FilterStage::AfterScoring);

    for query in ["", "n", "neural", "parsing transformers", "zzzz"] {
      let state = QueryState::builder().query(query).filters(filters.clone()).build();
      let a = before.search(&catalog.papers(), &state).unwrap();
      let b = after.search(&catalog.papers(), &state).unwrap();
      assert_eq!(numbers(&a), numbers(&b), "query {query:?}");
      assert_eq!(a.total, b.total);
    }
  }

  #[test]
  fn author_filters_use_union_of_papers() {
    let catalog = catalog();
    let state = QueryState::builder()
      .filters(FilterSet::new().track("Findings"))
      .build();
    let page = catalog.search_authors(&state).unwrap();
    assert_eq!(page.total, 2);

    let day = NaiveDate::from_ymd_opt(2025, 7, 28).unwrap();
    let state = QueryState::builder()
      .filters(FilterSet::new().dates(DateRange::on(day)))
      .build();
    let ids: Vec<&str> = catalog
      .search_authors(&state)
      .unwrap()
      .items
      .iter()
      .map(|h| h.record.id.as_str())
      .collect();
    assert_eq!(ids, vec!["a1"]);
  }

  #[test]
  fn invalid_paging_is_an_error() {
    let catalog = catalog();
    assert_eq!(
      catalog.search_papers(&QueryState::new("").with_page(0)).unwrap_err(),
      QueryError::InvalidPage
    );
    let zero = QueryState::builder().page_size(0).build();
    assert_eq!(catalog.search_papers(&zero).unwrap_err(), QueryError::InvalidPageSize);
  }

  #[test]
  fn presenters_follow_flags() {
    let catalog = catalog();
    let names: Vec<&str> = catalog
      .presenters("11")
      .unwrap()
      .iter()
      .map(|a| a.id.as_str())
      .collect();
    assert!(names.is_empty());
    assert_eq!(catalog.presenters("12").unwrap()[0].id, "a2");
    assert!(catalog.presenters("99").is_err());
  }

  #[test]
  fn facet_values_count_papers() {
    let catalog = catalog();
    let tracks = catalog.facet_values(Facet::Track);
    assert_eq!(
      tracks,
      vec![
        FacetCount {
          value: FilterValue::Text("Findings".into()),
          count: 1
        },
        FacetCount {
          value: FilterValue::Text("Main".into()),
          count: 2
        },
      ]
    );
    assert_eq!(catalog.facet_values(Facet::Date).len(), 2);
  }
}
