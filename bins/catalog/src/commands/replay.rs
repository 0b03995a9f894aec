//! Replay command - run a batch of listing queries through the cache

use super::open_catalog;
use crate::data;
use anyhow::Result;
use catalog_cli::output::{format_duration, format_percent, Status};
use catalog_cli::progress;
use catalog_core::cache::CacheStats;
use catalog_core::config::ConfigSchema;
use catalog_telemetry::HistogramStats;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Serialize)]
struct ReplayReport {
    queries: usize,
    rounds: u32,
    elapsed_ms: u128,
    cache: Option<CacheStats>,
    hit_rate: Option<f64>,
    latency_ms: Option<HistogramStats>,
}

const QUERY_METRIC: &str = "replay.query";

/// Run replay command
pub fn run(
    config: &ConfigSchema,
    products: &Path,
    queries: &Path,
    rounds: u32,
    json: bool,
) -> Result<()> {
    let service = open_catalog(config, Some(products), None)?;
    let queries = data::load_queries(queries)?;

    let total = queries.len() as u64 * u64::from(rounds);
    let pb = progress::query_progress(total);
    let started = Instant::now();

    for round in 0..rounds {
        for query in &queries {
            catalog_telemetry::timed_span!(QUERY_METRIC, round);
            service.list(query)?;
            pb.inc(1);
        }

        let purged = service.purge_expired();
        tracing::debug!(round, purged, "Expired listings purged");
    }

    let elapsed = started.elapsed();
    progress::finish_success(&pb, "Replay complete");

    let stats = service.cache_stats();
    let report = ReplayReport {
        queries: queries.len(),
        rounds,
        elapsed_ms: elapsed.as_millis(),
        hit_rate: stats.as_ref().map(CacheStats::hit_rate),
        cache: stats,
        latency_ms: catalog_telemetry::metrics().histogram_stats(QUERY_METRIC),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    Status::header("Cache statistics");
    println!("  Queries:    {} x {} rounds", report.queries, report.rounds);
    println!("  Elapsed:    {}", format_duration(elapsed));
    match &report.cache {
        Some(stats) => {
            println!("  Hits:       {}", stats.hits);
            println!("  Misses:     {}", stats.misses);
            println!("  Hit rate:   {}", format_percent(stats.hit_rate()));
            println!("  Entries:    {}", stats.total_entries);
            println!("  Expired:    {}", stats.expired_entries);
            println!("  Evictions:  {}", stats.evictions);
        }
        None => Status::warning("Caching is disabled in the configuration"),
    }

    if let Some(latency) = &report.latency_ms {
        Status::subheader("Query latency");
        println!("  Mean:       {:.2}ms", latency.mean);
        println!("  p50:        {:.2}ms", latency.p50);
        println!("  p95:        {:.2}ms", latency.p95);
        println!("  Max:        {:.2}ms", latency.max);
    }

    Ok(())
}
