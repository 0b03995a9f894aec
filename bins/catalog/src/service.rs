//! Catalog service: products, ranking, listing cache and category trees
//!
//! The service owns the product set and everything derived from it. Reads
//! go through the listing cache; every product write clears it.

use catalog_core::cache::{CacheConfig, CacheStats, ExpiringCache};
use catalog_core::category_tree::{CategoryForest, CategoryTreeBuilder};
use catalog_core::config::{ConfigSchema, SearchConfig};
use catalog_core::listing::{assemble_page, ListedProduct, ProductPage, ProductQuery};
use catalog_core::model::{Category, Product};
use catalog_core::{Error, Result, ResultExt};
use catalog_search::{SearchEngine, SearchError, SearchResult};
use catalog_telemetry::metrics;

fn product_name(product: &Product) -> Option<&str> {
    Some(product.name.as_str())
}

fn product_sku(product: &Product) -> Option<&str> {
    Some(product.sku.as_str())
}

fn product_description(product: &Product) -> Option<&str> {
    Some(product.description.as_str())
}

fn search_config_error(err: SearchError) -> Error {
    Error::invalid_config(format!("Invalid search configuration: {}", err)).with_source(err)
}

/// Build a product search engine from the `[search]` section
///
/// # Errors
/// Returns a configuration error for an unknown field name or any setting
/// the engine rejects.
pub fn build_engine(config: &SearchConfig) -> Result<SearchEngine<Product>> {
    let mut builder = SearchEngine::<Product>::builder().max_results(config.max_results);

    for field in &config.fields {
        builder = match field.name.as_str() {
            "name" => builder.weighted_field("name", field.weight, product_name),
            "sku" => builder.weighted_field("sku", field.weight, product_sku),
            "description" => builder.weighted_field("description", field.weight, product_description),
            other => {
                return Err(Error::invalid_config(format!("Unknown search field: {}", other)));
            }
        };
    }

    builder.build().map_err(search_config_error)
}

/// Product catalog with cached listings
pub struct CatalogService {
    products: Vec<Product>,
    categories: Vec<Category>,
    engine: SearchEngine<Product>,
    tree_builder: CategoryTreeBuilder,
    cache: Option<ExpiringCache<ProductPage>>,
}

impl CatalogService {
    /// Create a service over validated products
    ///
    /// # Errors
    /// Fails on invalid configuration, an invalid product, or two products
    /// sharing a SKU.
    pub fn new(products: Vec<Product>, categories: Vec<Category>, config: &ConfigSchema) -> Result<Self> {
        let engine = build_engine(&config.search)?;
        let cache = config
            .cache
            .enabled
            .then(|| ExpiringCache::new(CacheConfig::with_ttl(config.cache.default_ttl())));

        let mut service = Self {
            products: Vec::with_capacity(products.len()),
            categories,
            engine,
            tree_builder: CategoryTreeBuilder::with_max_depth(config.tree.max_depth),
            cache,
        };

        for product in products {
            let id = product.id;
            service
                .insert_checked(product)
                .context(format!("While loading product {}", id))?;
        }

        metrics().gauge("catalog.products", service.products.len() as u64);
        metrics().gauge("catalog.categories", service.categories.len() as u64);
        tracing::debug!(
            products = service.products.len(),
            categories = service.categories.len(),
            cache_enabled = service.cache.is_some(),
            "Catalog service ready"
        );

        Ok(service)
    }

    /// Products in load order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id
    pub fn product(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Rank products against `query`
    ///
    /// `limit` defaults to the configured maximum.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<SearchResult<'_, Product>> {
        let limit = limit.unwrap_or_else(|| self.engine.max_results());
        metrics().increment("search.queries");
        self.engine.search(&self.products, query, limit)
    }

    /// One page of the catalog, served from the cache when possible
    ///
    /// # Errors
    /// Returns a validation error for malformed paging or price bounds.
    pub fn list(&self, query: &ProductQuery) -> Result<ProductPage> {
        query.validate()?;

        let Some(cache) = &self.cache else {
            return Ok(self.compute_page(query));
        };

        let key = query.cache_key();
        if let Some(page) = cache.get(&key) {
            metrics().increment("cache.hit");
            tracing::trace!(key = %key, "Listing served from cache");
            return Ok(page);
        }

        metrics().increment("cache.miss");
        let page = self.compute_page(query);
        cache.set(key, page.clone(), None);
        Ok(page)
    }

    fn compute_page(&self, query: &ProductQuery) -> ProductPage {
        let candidates = match query.search_text() {
            Some(text) => self
                .engine
                .search(&self.products, text, self.products.len())
                .into_iter()
                .map(|hit| ListedProduct::scored(hit.item.clone(), hit.score))
                .collect(),
            None => self.products.iter().cloned().map(ListedProduct::plain).collect(),
        };

        assemble_page(candidates, query)
    }

    /// Rebuild the category forest
    pub fn category_forest(&self) -> CategoryForest {
        self.tree_builder.build_forest(&self.categories)
    }

    /// Insert a new product or replace the one with the same id
    ///
    /// # Errors
    /// Fails validation, or when another product already uses the SKU.
    pub fn upsert_product(&mut self, product: Product) -> Result<()> {
        self.insert_checked(product)?;
        self.invalidate();
        Ok(())
    }

    /// Remove a product by id
    ///
    /// # Errors
    /// Returns [`Error::product_not_found`] for an unknown id.
    pub fn remove_product(&mut self, id: i64) -> Result<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::product_not_found(id))?;

        let removed = self.products.remove(index);
        self.invalidate();
        Ok(removed)
    }

    /// Cache counters, `None` when caching is disabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ExpiringCache::stats)
    }

    /// Drop expired cache entries
    pub fn purge_expired(&self) -> usize {
        self.cache.as_ref().map_or(0, ExpiringCache::purge_expired)
    }

    fn insert_checked(&mut self, product: Product) -> Result<()> {
        product.validate()?;

        let clash = self
            .products
            .iter()
            .any(|p| p.id != product.id && p.sku.eq_ignore_ascii_case(&product.sku));
        if clash {
            return Err(Error::duplicate_sku(&product.sku));
        }

        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
        Ok(())
    }

    fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
            metrics().increment("cache.invalidations");
        }
    }
}
