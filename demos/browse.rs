//! Loads a conference snapshot and runs a few searches against it.
//!
//! ```text
//! cargo run --example browse -- [snapshot.json] [query]
//! RUST_LOG=confsearch=debug cargo run --example browse
//! ```
use confsearch::prelude::*;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SAMPLE: &str = include_str!("data/sample_snapshot.json");

fn print_papers(catalog: &Catalog, label: &str, state: &QueryState) {
  println!("--- {label} ---");
  match catalog.search_papers(state) {
    Ok(page) => {
      for hit in &page.items {
        let paper = hit.record;
        println!(
          "[{}] {} (distance {:.3}{})",
          paper.paper_number,
          paper.title,
          hit.distance,
          if hit.exact { ", exact" } else { "" }
        );
        let preview = paper.abstract_preview(catalog.config().abstract_preview_chars);
        if !preview.is_empty() {
          println!("    {preview}");
        }
      }
      println!(
        "page {}/{} ({} matches)\n",
        page.page,
        page.page_count().max(1),
        page.total
      );
    }
    Err(e) => println!("error: {e}\n"),
  }
}

fn main() -> confsearch::Result<()> {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let mut args = std::env::args().skip(1);
  let dataset = match args.next() {
    Some(path) => Dataset::from_snapshot_path(path)?,
    None => Dataset::from_snapshot_json(SAMPLE)?,
  };
  let query = args.next().unwrap_or_else(|| "retreival".to_string());

  let catalog = Catalog::new(dataset, EngineConfig::default().page_size(3));

  println!("=== Confsearch ===\n");
  print_papers(&catalog, "browse", &catalog.query(""));
  print_papers(&catalog, &format!("query: {query:?}"), &catalog.query(query.as_str()));
  print_papers(&catalog, "short query: \"r\"", &catalog.query("r"));

  let posters = QueryState::builder()
    .filters(FilterSet::new().presentation(PresentationType::Poster).track("Main"))
    .build();
  print_papers(&catalog, "Main posters", &posters);

  println!("--- tracks ---");
  for facet in catalog.facet_values(Facet::Track) {
    println!("{:?}: {}", facet.value, facet.count);
  }
  println!();

  let author = catalog.author("lukas-mueller")?;
  println!("--- papers by {} ({}) ---", author.name, author.slug());
  for paper in catalog.papers_by_author(&author.id)? {
    let presenters: Vec<&str> = catalog
      .presenters(&paper.paper_number)?
      .iter()
      .map(|a| a.name.as_str())
      .collect();
    println!("[{}] {} presented by {:?}", paper.paper_number, paper.title, presenters);
  }
  println!();

  // Simulated typing: only the final state reaches the engine.
  let mut coordinator: SearchCoordinator<usize> = Debouncer::from_config(catalog.config());
  let start = Instant::now();
  for (i, prefix) in ["m", "mu", "mul", "mult", "multil"].iter().enumerate() {
    coordinator.submit(catalog.query(*prefix), start + Duration::from_millis(40 * i as u64));
  }
  if let Some(wake) = coordinator.deadline() {
    let delivery = coordinator.run_due(wake, |state| {
      println!("debounced search for {:?}", state.query);
      catalog.search_papers(state).map(|p| p.total).unwrap_or(0)
    });
    println!("{delivery:?}, {:?} matches displayed", coordinator.displayed());
  }

  Ok(())
}
