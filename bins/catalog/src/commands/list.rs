//! List command - filtered, sorted, paginated catalog pages

use super::open_catalog;
use anyhow::Result;
use catalog_cli::output::{format_price, Status};
use catalog_core::config::ConfigSchema;
use catalog_core::listing::{ProductPage, ProductQuery};
use owo_colors::OwoColorize;
use std::path::Path;

/// Run list command
pub fn run(config: &ConfigSchema, products: &Path, query: &ProductQuery, json: bool) -> Result<()> {
    let service = open_catalog(config, Some(products), None)?;

    let page = {
        catalog_telemetry::timed_span!("list", page = query.page);
        service.list(query)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page);
    }

    Ok(())
}

fn print_page(page: &ProductPage) {
    if page.items.is_empty() {
        Status::info(&format!(
            "Page {} is empty ({} matching products)",
            page.page, page.total_count
        ));
        return;
    }

    Status::header(&format!(
        "Page {} of {} ({} products)",
        page.page,
        page.total_pages(),
        page.total_count
    ));

    for item in &page.items {
        let product = &item.product;
        let stock = if product.is_available() {
            format!("{} in stock", product.quantity).green().to_string()
        } else {
            "sold out".red().to_string()
        };
        let score = item
            .score
            .map(|s| format!("{:.3}", s))
            .unwrap_or_default();

        println!(
            "  {:<12} {:>12}  {:<12} {:>5}  {}",
            product.sku.cyan(),
            format_price(product.price),
            stock,
            score.dimmed(),
            product.name
        );
    }

    if page.has_next() {
        println!();
        println!("  {}", format!("More results on page {}", page.page + 1).dimmed());
    }
}
