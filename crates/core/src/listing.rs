//! Product listing: filtering, ordering and pagination
//!
//! A [`ProductQuery`] describes one page of the catalog. Relevance ranking
//! lives in the search crate; callers hand this module the candidates (with
//! their scores when the query was searched) and get a [`ProductPage`] back.

use crate::error::{Error, Result};
use crate::model::Product;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Default page size
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Prefix of every listing cache key
pub const CACHE_KEY_PREFIX: &str = "products:";

/// Field a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Catalog order: name, then price, then SKU
    Name,
    Price,
    Quantity,
    CreatedAt,
}

impl SortField {
    /// All sort fields
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::Price,
        SortField::Quantity,
        SortField::CreatedAt,
    ];

    /// Name used on the wire and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::Quantity => "quantity",
            SortField::CreatedAt => "createdAt",
        }
    }

    /// Compare two products by this field, ascending
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Name => a.catalog_cmp(b),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "price" => Ok(SortField::Price),
            "quantity" => Ok(SortField::Quantity),
            "createdat" | "created_at" | "created" => Ok(SortField::CreatedAt),
            _ => Err(Error::validation(format!("Unknown sort field: {}", s))
                .with_suggestion("Use one of: name, price, quantity, createdAt")),
        }
    }
}

/// Parameters of one catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQuery {
    /// Free-text query, ranked by relevance
    pub search: Option<String>,
    pub category_id: Option<i64>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// `Some(true)` keeps products in stock, `Some(false)` keeps sold-out ones
    pub in_stock: Option<bool>,
    pub sort_by: Option<SortField>,
    pub ascending: bool,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category_id: None,
            min_price: None,
            max_price: None,
            in_stock: None,
            sort_by: None,
            ascending: true,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// Query for the first page of everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the sort field and direction
    #[must_use]
    pub fn sorted_by(mut self, field: SortField, ascending: bool) -> Self {
        self.sort_by = Some(field);
        self.ascending = ascending;
        self
    }

    /// Set the page and page size
    #[must_use]
    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// The search text, if any non-blank text was given
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Check paging and price bounds
    ///
    /// # Errors
    /// Returns a validation error for a zero page or page size, a negative
    /// or non-finite price bound, or a minimum above the maximum.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(Error::validation("Page must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(Error::validation("Page size must be at least 1"));
        }
        for bound in [self.min_price, self.max_price].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(Error::validation(format!("Invalid price bound: {}", bound)));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(Error::validation(format!(
                    "Minimum price {} exceeds maximum price {}",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Whether a product passes the category, price and stock filters
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = self.category_id {
            if product.category_id != Some(category_id) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if let Some(in_stock) = self.in_stock {
            if product.is_available() != in_stock {
                return false;
            }
        }
        true
    }

    /// Number of items skipped before this page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }

    /// Deterministic cache key covering every parameter
    pub fn cache_key(&self) -> String {
        // Struct serialization has a fixed field order, so equal queries
        // always produce identical bytes.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        format!("{}{}", CACHE_KEY_PREFIX, hex::encode(digest))
    }
}

/// A product in a listing, with its relevance score when searched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ListedProduct {
    /// Unscored entry
    pub fn plain(product: Product) -> Self {
        Self { product, score: None }
    }

    /// Entry carrying a relevance score
    pub fn scored(product: Product, score: f64) -> Self {
        Self {
            product,
            score: Some(score),
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<ListedProduct>,
    /// Matches across all pages
    pub total_count: usize,
    pub page: u32,
    pub page_size: u32,
}

impl ProductPage {
    /// Number of pages needed for `total_count`
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size as usize)
    }

    /// Whether a later page exists
    pub fn has_next(&self) -> bool {
        (self.page as usize) < self.total_pages()
    }
}

/// Filter, order and paginate candidates for `query`
///
/// Candidates from a search must arrive in relevance order; that order is
/// kept unless the query names a sort field. Unsearched listings default to
/// catalog order. Sorting is stable.
pub fn assemble_page(candidates: Vec<ListedProduct>, query: &ProductQuery) -> ProductPage {
    let mut items: Vec<ListedProduct> = candidates
        .into_iter()
        .filter(|item| query.matches(&item.product))
        .collect();

    let sort_by = match (query.sort_by, query.search_text()) {
        (Some(field), _) => Some(field),
        (None, Some(_)) => None,
        (None, None) => Some(SortField::Name),
    };

    if let Some(field) = sort_by {
        if query.ascending {
            items.sort_by(|a, b| field.compare(&a.product, &b.product));
        } else {
            items.sort_by(|a, b| field.compare(&b.product, &a.product));
        }
    } else if !query.ascending {
        items.reverse();
    }

    let total_count = items.len();
    let items = items
        .into_iter()
        .skip(query.offset())
        .take(query.page_size as usize)
        .collect();

    ProductPage {
        items,
        total_count,
        page: query.page,
        page_size: query.page_size,
    }
}

/// List products without relevance ranking
pub fn list_products(products: &[Product], query: &ProductQuery) -> ProductPage {
    let candidates = products.iter().cloned().map(ListedProduct::plain).collect();
    assemble_page(candidates, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(id: i64, name: &str, price: f64, quantity: u32, category_id: Option<i64>) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            sku: format!("SKU-{id}"),
            price,
            quantity,
            category_id,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
            updated_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Mouse", 25.0, 10, Some(1)),
            product(2, "Laptop", 900.0, 0, Some(1)),
            product(3, "Desk", 300.0, 2, Some(2)),
            product(4, "Chair", 150.0, 5, Some(2)),
            product(5, "Monitor", 250.0, 0, None),
        ]
    }

    fn ids(page: &ProductPage) -> Vec<i64> {
        page.items.iter().map(|item| item.product.id).collect()
    }

    #[test]
    fn test_default_query() {
        let query = ProductQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert!(query.ascending);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_from_partial_json() {
        let query: ProductQuery =
            serde_json::from_str(r#"{"search": "lap", "sortBy": "createdAt", "inStock": true}"#).unwrap();

        assert_eq!(query.search_text(), Some("lap"));
        assert_eq!(query.sort_by, Some(SortField::CreatedAt));
        assert_eq!(query.in_stock, Some(true));
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_default_order_is_by_name() {
        let page = list_products(&catalog(), &ProductQuery::new());
        assert_eq!(ids(&page), vec![4, 3, 2, 5, 1]);
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn test_sort_descending_by_price() {
        let query = ProductQuery::new().sorted_by(SortField::Price, false);
        let page = list_products(&catalog(), &query);
        assert_eq!(ids(&page), vec![2, 3, 5, 4, 1]);
    }

    #[test]
    fn test_sort_by_created_at() {
        let query = ProductQuery::new().sorted_by(SortField::CreatedAt, true);
        let page = list_products(&catalog(), &query);
        assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filters() {
        let query = ProductQuery {
            category_id: Some(1),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&list_products(&catalog(), &query)), vec![2, 1]);

        let query = ProductQuery {
            min_price: Some(150.0),
            max_price: Some(300.0),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&list_products(&catalog(), &query)), vec![4, 3, 5]);

        let query = ProductQuery {
            in_stock: Some(false),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&list_products(&catalog(), &query)), vec![2, 5]);
    }

    #[test]
    fn test_pagination() {
        let query = ProductQuery::new().with_page(2, 2);
        let page = list_products(&catalog(), &query);

        assert_eq!(ids(&page), vec![2, 5]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let query = ProductQuery::new().with_page(9, 2);
        let page = list_products(&catalog(), &query);

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);
        assert!(!page.has_next());
    }

    #[test]
    fn test_searched_listing_keeps_relevance_order() {
        let products = catalog();
        let candidates = vec![
            ListedProduct::scored(products[4].clone(), 2.4),
            ListedProduct::scored(products[0].clone(), 1.8),
        ];

        let page = assemble_page(candidates, &ProductQuery::new().with_search("mo"));

        assert_eq!(ids(&page), vec![5, 1]);
        assert_eq!(page.items[0].score, Some(2.4));
    }

    #[test]
    fn test_validate_rejects_bad_bounds() {
        assert!(ProductQuery::new().with_page(0, 10).validate().is_err());
        assert!(ProductQuery::new().with_page(1, 0).validate().is_err());

        let inverted = ProductQuery {
            min_price: Some(10.0),
            max_price: Some(5.0),
            ..ProductQuery::default()
        };
        assert!(inverted.validate().is_err());

        let negative = ProductQuery {
            min_price: Some(-1.0),
            ..ProductQuery::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let a = ProductQuery::new().with_search("laptop").with_page(2, 10);
        let b = ProductQuery::new().with_search("laptop").with_page(2, 10);

        assert_eq!(a.cache_key(), b.cache_key());
        assert!(a.cache_key().starts_with(CACHE_KEY_PREFIX));
        assert_eq!(a.cache_key().len(), CACHE_KEY_PREFIX.len() + 64);
    }

    #[test]
    fn test_cache_key_covers_every_parameter() {
        let base = ProductQuery::new();
        let variants = [
            ProductQuery::new().with_search("x"),
            ProductQuery { category_id: Some(1), ..ProductQuery::default() },
            ProductQuery { min_price: Some(1.0), ..ProductQuery::default() },
            ProductQuery { max_price: Some(1.0), ..ProductQuery::default() },
            ProductQuery { in_stock: Some(true), ..ProductQuery::default() },
            ProductQuery::new().sorted_by(SortField::Price, true),
            ProductQuery { ascending: false, ..ProductQuery::default() },
            ProductQuery::new().with_page(2, DEFAULT_PAGE_SIZE),
            ProductQuery::new().with_page(1, 50),
        ];

        for variant in &variants {
            assert_ne!(variant.cache_key(), base.cache_key(), "{:?}", variant);
        }
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("Price".parse::<SortField>().unwrap(), SortField::Price);
        assert_eq!("createdAt".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert!("rating".parse::<SortField>().is_err());
        for field in SortField::ALL {
            assert_eq!(field.as_str().parse::<SortField>().unwrap(), field);
        }
    }

    #[test]
    fn test_listed_product_serializes_flat() {
        let item = ListedProduct::scored(product(1, "Mouse", 25.0, 1, None), 1.5);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["name"], "Mouse");
        assert_eq!(json["score"], 1.5);
        assert!(serde_json::to_value(ListedProduct::plain(item.product)).unwrap().get("score").is_none());
    }
}
