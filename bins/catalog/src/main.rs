//! catalog: search, list and browse a product catalog from JSON exports.

use catalog_cli::output::{report_error, report_error_json, Status};
use catalog_core::config::{Config, ConfigSchema};
use catalog_core::error::exit_codes;
use catalog_core::Error;
use catalog_core::listing::{ProductQuery, SortField, DEFAULT_PAGE_SIZE};
use catalog_telemetry::TelemetryConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod data;
mod service;

/// Product catalog search and browsing
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to catalog.toml, .catalog.toml or .config/catalog.toml)
    #[arg(short, long, global = true, env = "CATALOG_CONFIG")]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print collected metrics as JSON to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank products against a free-text query
    Search {
        /// Query text
        query: String,

        /// JSON array of products
        #[arg(short, long)]
        products: PathBuf,

        /// Maximum number of results (defaults to search.max_results)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter, sort and page through products
    List {
        /// JSON array of products
        #[arg(short, long)]
        products: PathBuf,

        #[command(flatten)]
        filter: ListArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the category hierarchy
    Tree {
        /// JSON array of categories
        #[arg(long)]
        categories: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run JSON-lines listing queries through the cache and report statistics
    Replay {
        /// JSON array of products
        #[arg(short, long)]
        products: PathBuf,

        /// One listing query per line
        #[arg(short, long)]
        queries: PathBuf,

        /// Number of passes over the query file
        #[arg(short, long, default_value = "1")]
        rounds: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Free-text query; results keep relevance order unless --sort-by is given
    #[arg(short, long)]
    search: Option<String>,

    /// Only products in this category
    #[arg(long)]
    category: Option<i64>,

    /// Minimum price (inclusive)
    #[arg(long)]
    min_price: Option<f64>,

    /// Maximum price (inclusive)
    #[arg(long)]
    max_price: Option<f64>,

    /// Only products with stock
    #[arg(long, conflicts_with = "out_of_stock")]
    in_stock: bool,

    /// Only sold-out products
    #[arg(long)]
    out_of_stock: bool,

    /// Sort field: name, price, quantity, createdAt
    #[arg(long)]
    sort_by: Option<SortField>,

    /// Sort in descending order
    #[arg(long)]
    descending: bool,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    page: u32,

    /// Products per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

impl Commands {
    /// Whether output, including failures, should be JSON
    fn json(&self) -> bool {
        match self {
            Commands::Search { json, .. }
            | Commands::List { json, .. }
            | Commands::Tree { json, .. }
            | Commands::Replay { json, .. } => *json,
        }
    }
}

impl ListArgs {
    fn into_query(self) -> ProductQuery {
        let in_stock = match (self.in_stock, self.out_of_stock) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };

        ProductQuery {
            search: self.search,
            category_id: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock,
            sort_by: self.sort_by,
            ascending: !self.descending,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn telemetry_config(schema: &ConfigSchema, verbose: bool) -> TelemetryConfig {
    let config = TelemetryConfig::new(schema.logging.level.clone(), schema.logging.show_target);
    if verbose { config.verbose() } else { config }
}

fn run(command: Commands, schema: &ConfigSchema) -> anyhow::Result<()> {
    match command {
        Commands::Search { query, products, limit, json } => {
            commands::search::run(schema, &products, &query, limit, json)
        }
        Commands::List { products, filter, json } => {
            commands::list::run(schema, &products, &filter.into_query(), json)
        }
        Commands::Tree { categories, json } => commands::tree::run(schema, &categories, json),
        Commands::Replay { products, queries, rounds, json } => {
            commands::replay::run(schema, &products, &queries, rounds, json)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn report(err: &Error, json: bool) -> ExitCode {
    exit_code(if json { report_error_json(err) } else { report_error(err) })
}

fn into_catalog_error(err: anyhow::Error) -> Error {
    match err.downcast::<Error>() {
        Ok(err) => err,
        Err(other) => Error::internal(format!("{:#}", other)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.command.json();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report(&e, json),
    };

    if let Err(e) = catalog_telemetry::init_with_config(telemetry_config(&config.schema, cli.verbose)) {
        Status::warning(&format!("Logging disabled: {}", e));
    }
    tracing::debug!(path = ?config.path, "Using configuration");

    let result = run(cli.command, &config.schema);

    if cli.metrics {
        eprintln!("{}", catalog_telemetry::metrics().export_json());
    }

    match result {
        Ok(()) => exit_code(exit_codes::SUCCESS),
        Err(e) => report(&into_catalog_error(e), json),
    }
}
