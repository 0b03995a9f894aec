//! Search command - rank products against a free-text query

use super::open_catalog;
use anyhow::Result;
use catalog_cli::output::{format_count, format_price, Status};
use catalog_core::config::ConfigSchema;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct JsonHit<'a> {
    rank: usize,
    score: f64,
    id: i64,
    sku: &'a str,
    name: &'a str,
    price: f64,
}

/// Run search command
pub fn run(config: &ConfigSchema, products: &Path, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let service = open_catalog(config, Some(products), None)?;

    let results = {
        catalog_telemetry::timed_span!("search", query = %query);
        service.search(query, limit)
    };

    if json {
        let hits: Vec<JsonHit<'_>> = results
            .iter()
            .enumerate()
            .map(|(i, hit)| JsonHit {
                rank: i + 1,
                score: hit.score,
                id: hit.item.id,
                sku: &hit.item.sku,
                name: &hit.item.name,
                price: hit.item.price,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if results.is_empty() {
        Status::info(&format!("No products match '{}'", query));
        return Ok(());
    }

    Status::header(&format!("Results for '{}'", query));
    println!(
        "  {:>3}  {:>5}  {:<12} {:>12}  {}",
        "#".dimmed(),
        "Score".dimmed(),
        "SKU".dimmed(),
        "Price".dimmed(),
        "Name".dimmed()
    );
    for (i, hit) in results.iter().enumerate() {
        println!(
            "  {:>3}  {:>5.3}  {:<12} {:>12}  {}",
            i + 1,
            hit.score,
            hit.item.sku.cyan(),
            format_price(hit.item.price),
            hit.item.name
        );
    }
    println!();
    Status::success(&format_count(results.len(), "match", "matches"));

    Ok(())
}
