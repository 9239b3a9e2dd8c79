//! `linkdex search` - run one query and print the ranking.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use linkdex_types::record::RankedResult;

use crate::state::AppState;

pub async fn search(state: &AppState, term: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let mut results = state.search_service.search(term).await?;
    let total = results.len();
    if let Some(limit) = limit.or(state.config.server.default_limit) {
        results.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!();
        println!("  {}", style("The corpus is empty.").dim());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", results_table(&results));
    println!();
    println!(
        "  {}",
        style(format!("Showing {} of {total} records", results.len())).dim()
    );
    println!();

    Ok(())
}

fn results_table(results: &[RankedResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Score", "Title", "Date", "URL"]);

    for (i, result) in results.iter().enumerate() {
        let score = match result.score {
            Some(score) => Cell::new(format!("{score:.3}")).fg(score_color(score)),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            score,
            Cell::new(&result.title),
            Cell::new(result.published_at.format("%Y-%m-%d")),
            Cell::new(&result.url).fg(Color::Cyan),
        ]);
    }
    table
}

fn score_color(score: f64) -> Color {
    if score >= 0.5 {
        Color::Green
    } else if score >= 0.25 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}
