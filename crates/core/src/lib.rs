//! Core building blocks for the product catalog
//!
//! This crate provides the pieces shared by every catalog front end:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Model**: products and categories as stored
//! - **Listing**: filtering, ordering, pagination and cache keys for product pages
//! - **Category trees**: depth-bounded forest reconstruction from flat records
//! - **Caching**: a thread-safe string-keyed cache with per-entry expiry
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust
//! use catalog_core::prelude::*;
//!
//! let categories = vec![
//!     Category::new(1, "Electronics", None),
//!     Category::new(2, "Laptops", Some(1)),
//! ];
//! let tree = CategoryTreeBuilder::new().build_tree_list(&categories);
//! assert_eq!(tree[0].children[0].name, "Laptops");
//!
//! let cache: ExpiringCache<usize> = ExpiringCache::default();
//! let key = ProductQuery::new().with_search("laptop").cache_key();
//! cache.set(key.clone(), tree.len(), None);
//! assert_eq!(cache.get(&key), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod category_tree;
pub mod config;
pub mod error;
pub mod listing;
pub mod model;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{CacheConfig, CacheStats, ExpiringCache};
    pub use crate::category_tree::{
        CategoryForest, CategoryNode, CategoryTreeBuilder, ExcludedCategory, ExclusionReason,
    };
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::listing::{assemble_page, list_products, ListedProduct, ProductPage, ProductQuery, SortField};
    pub use crate::model::{Category, Product};
}
