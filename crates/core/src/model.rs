//! Catalog entities
//!
//! Plain data records as handed over by the persistence layer. JSON field
//! names are camelCase to match the catalog API.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "SKU")]
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is in stock
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Check the fields a product must carry before it is stored
    ///
    /// # Errors
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Name is required"));
        }
        if self.sku.trim().is_empty() {
            return Err(Error::validation("SKU is required"));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(Error::validation("Price must be greater than 0"));
        }
        Ok(())
    }

    /// Natural catalog order: name (case-insensitive), then price, then SKU
    pub fn catalog_cmp(&self, other: &Self) -> Ordering {
        cmp_ignore_case(&self.name, &other.name)
            .then_with(|| self.price.total_cmp(&other.price))
            .then_with(|| cmp_ignore_case(&self.sku, &other.sku))
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// A catalog category as stored: a flat record pointing at its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_category_id: Option<i64>,
}

impl Category {
    /// Convenience constructor
    pub fn new(id: i64, name: impl Into<String>, parent_category_id: Option<i64>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            parent_category_id,
        }
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
