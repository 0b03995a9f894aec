//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Product fields a search can be configured over
pub const KNOWN_SEARCH_FIELDS: [&str; 3] = ["name", "description", "sku"];

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check value ranges and field names
    ///
    /// # Errors
    /// Returns a configuration validation error for the first bad value.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;

        if self.cache.default_ttl_secs == 0 {
            return Err(Error::invalid_config("cache.default_ttl_secs must be greater than 0"));
        }
        if self.tree.max_depth == 0 {
            return Err(Error::invalid_config("tree.max_depth must be greater than 0"));
        }
        Ok(())
    }
}

/// Search ranking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of ranked results
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Fields searched, in tie-break order
    #[serde(default = "default_search_fields")]
    pub fields: Vec<SearchFieldConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            fields: default_search_fields(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(Error::invalid_config("search.max_results must be greater than 0"));
        }
        if self.fields.is_empty() {
            return Err(Error::invalid_config("search.fields must not be empty"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !KNOWN_SEARCH_FIELDS.contains(&field.name.as_str()) {
                return Err(Error::invalid_config(format!("Unknown search field: {}", field.name))
                    .with_suggestion(format!("Use one of: {}", KNOWN_SEARCH_FIELDS.join(", "))));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::invalid_config(format!(
                    "Search field listed twice: {}",
                    field.name
                )));
            }
            if !field.weight.is_finite() || field.weight <= 0.0 {
                return Err(Error::invalid_config(format!(
                    "Search field {} has invalid weight {}",
                    field.name, field.weight
                )));
            }
        }
        Ok(())
    }
}

/// One searched field and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFieldConfig {
    pub name: String,

    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl SearchFieldConfig {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

fn default_max_results() -> usize {
    50
}

fn default_weight() -> f64 {
    1.0
}

fn default_search_fields() -> Vec<SearchFieldConfig> {
    vec![
        SearchFieldConfig::new("name", 3.0),
        SearchFieldConfig::new("sku", 2.0),
        SearchFieldConfig::new("description", 1.0),
    ]
}

/// Listing cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Lifetime of entries stored without an explicit TTL
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Serve repeated listings from the cache
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            enabled: true,
        }
    }
}

impl CacheSettings {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

/// Category tree configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Deepest level kept in the tree
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    crate::category_tree::DEFAULT_MAX_DEPTH
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Include the module path in log lines
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            show_target: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
