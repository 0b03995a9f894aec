//! CLI command implementations

pub mod list;
pub mod replay;
pub mod search;
pub mod tree;

use crate::data;
use crate::service::CatalogService;
use catalog_cli::progress;
use catalog_core::config::ConfigSchema;
use std::path::Path;

/// Load products (and optionally categories) into a service
pub(crate) fn open_catalog(
    config: &ConfigSchema,
    products: Option<&Path>,
    categories: Option<&Path>,
) -> catalog_core::Result<CatalogService> {
    let pb = progress::spinner("Loading catalog...");

    let products = match products {
        Some(path) => data::load_products(path)?,
        None => Vec::new(),
    };
    let categories = match categories {
        Some(path) => data::load_categories(path)?,
        None => Vec::new(),
    };
    let service = CatalogService::new(products, categories, config);
    pb.finish_and_clear();
    service
}
