//! `linkdex check` - validate configuration and corpus without serving.
//!
//! Exits non-zero when the corpus cannot be loaded. A missing API key is
//! reported but does not fail the check, since `stats` works without one.
//! A configured `[embedding] dimension` is enforced on every row, so a
//! mismatch shows up as a load failure.

use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use linkdex_types::config::LinkdexConfig;

use super::stats::{corpus_stats, load_corpus};

pub async fn check(config: &LinkdexConfig, data_dir: &Path, json: bool) -> Result<()> {
    let corpus = load_corpus(config, data_dir).await;
    let key_var = config.embedding.api_key_env_or_default();
    let has_key = std::env::var(key_var).is_ok_and(|v| !v.trim().is_empty());

    if json {
        let check = serde_json::json!({
            "corpus_loaded": corpus.is_ok(),
            "corpus_error": corpus.as_ref().err().map(|e| e.to_string()),
            "stats": corpus.as_ref().ok().map(|c| corpus_stats(c, config)),
            "api_key_env": key_var,
            "api_key_present": has_key,
            "healthy": corpus.is_ok() && has_key,
        });
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        let check_mark = |ok: bool| {
            if ok {
                format!("{}", style("✓").green())
            } else {
                format!("{}", style("✗").red())
            }
        };

        println!();
        println!("  {} Health check", style("🔍").bold());
        println!();
        match &corpus {
            Ok(corpus) => {
                let stats = corpus_stats(corpus, config);
                println!(
                    "  {} Corpus loaded: {} records from {}",
                    check_mark(true),
                    stats.records,
                    style(&stats.source).dim()
                );
                if stats.skipped_rows > 0 {
                    println!(
                        "  {} {} malformed rows skipped",
                        style("!").yellow(),
                        stats.skipped_rows
                    );
                }
            }
            Err(e) => println!("  {} Corpus failed to load: {e}", check_mark(false)),
        }
        println!("  {} {key_var} is set", check_mark(has_key));
        println!();
    }

    if let Err(e) = corpus {
        bail!("corpus check failed: {e}");
    }
    Ok(())
}
