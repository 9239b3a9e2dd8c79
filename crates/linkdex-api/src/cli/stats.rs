//! `linkdex stats` - load the corpus and summarize it.
//!
//! Loads straight from the configured source, so it works without an
//! embedding API key.

use std::path::Path;

use anyhow::Result;
use console::style;

use linkdex_core::corpus::{Corpus, LoadOptions};
use linkdex_infra::source::build_source;
use linkdex_types::config::LinkdexConfig;
use linkdex_types::record::CorpusStats;

/// Build the configured corpus once, outside any search service.
pub async fn load_corpus(config: &LinkdexConfig, data_dir: &Path) -> Result<Corpus> {
    let source = build_source(&config.corpus, data_dir)?;
    let options = LoadOptions {
        expected_dimension: config.embedding.dimension,
        on_malformed: config.corpus.on_malformed,
    };
    Ok(Corpus::from_source(&source, options).await?)
}

pub fn corpus_stats(corpus: &Corpus, config: &LinkdexConfig) -> CorpusStats {
    let report = corpus.report();
    CorpusStats {
        records: corpus.len(),
        dimension: corpus.dimension(),
        skipped_rows: report.skipped.len(),
        model: config.embedding.model_or_default().to_string(),
        source: report.source.clone(),
        loaded_at: report.loaded_at,
    }
}

pub async fn stats(config: &LinkdexConfig, data_dir: &Path, json: bool) -> Result<()> {
    let corpus = load_corpus(config, data_dir).await?;
    let stats = corpus_stats(&corpus, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} linkdex v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Corpus ──").dim());
    println!("  Records:   {}", style(stats.records).bold());
    match stats.dimension {
        Some(dim) => println!("  Dimension: {dim}"),
        None => println!("  Dimension: {}", style("n/a").dim()),
    }
    if stats.skipped_rows > 0 {
        println!("  Skipped:   {}", style(stats.skipped_rows).yellow());
    }
    println!("  Source:    {}", style(&stats.source).dim());
    println!();

    println!("  {}", style("── Embedding ──").dim());
    println!("  Provider:  {:?}", config.embedding.provider);
    println!("  Model:     {}", stats.model);
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir:  {}", style(data_dir.display()).dim());
    println!();

    Ok(())
}
