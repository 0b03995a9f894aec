//! Weighted multi-field search over in-memory items.
//!
//! An engine is configured once with an ordered list of fields, each a
//! `(name, accessor, weight)` triple, and then ranks any slice of items
//! against free-text queries. Engines hold no mutable state and can be
//! shared across threads.

use crate::error::{Result, SearchError};
use crate::normalize::normalize;
use crate::relevance::fuzzy_score;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// Weight applied to fields declared without one.
pub const DEFAULT_FIELD_WEIGHT: f64 = 1.0;

/// Default cap on returned results.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Reads one text field from an item.
///
/// Returning `None` is treated like an empty field: it contributes neither
/// score nor weight. Closures of the shape `Fn(&T) -> Option<&str>`
/// implement this trait directly.
pub trait FieldAccessor<T>: Send + Sync {
    /// Current text of the field for `item`.
    fn field_text<'a>(&self, item: &'a T) -> Option<Cow<'a, str>>;
}

impl<T, F> FieldAccessor<T> for F
where
    F: for<'a> Fn(&'a T) -> Option<&'a str> + Send + Sync,
{
    fn field_text<'a>(&self, item: &'a T) -> Option<Cow<'a, str>> {
        self(item).map(Cow::Borrowed)
    }
}

/// A named, weighted field of `T`.
pub struct SearchField<T> {
    name: String,
    weight: f64,
    accessor: Box<dyn FieldAccessor<T>>,
}

impl<T> SearchField<T> {
    /// Create a field with [`DEFAULT_FIELD_WEIGHT`].
    pub fn new(name: impl Into<String>, accessor: impl FieldAccessor<T> + 'static) -> Self {
        Self {
            name: name.into(),
            weight: DEFAULT_FIELD_WEIGHT,
            accessor: Box::new(accessor),
        }
    }

    /// Override the field weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl<T> fmt::Debug for SearchField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchField")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// A ranked item.
#[derive(Debug, Serialize)]
pub struct SearchResult<'a, T> {
    /// The matched item, borrowed from the candidate slice
    pub item: &'a T,
    /// Weighted relevance in `[0, 1]`; 0.0 only in browse mode
    pub score: f64,
}

impl<T> Clone for SearchResult<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SearchResult<'_, T> {}

/// Fuzzy search engine over items of type `T`.
///
/// # Example
/// ```
/// use catalog_search::SearchEngine;
///
/// struct Product { name: String, sku: String, description: Option<String> }
///
/// let engine = SearchEngine::<Product>::builder()
///     .weighted_field("name", 3.0, |p| Some(p.name.as_str()))
///     .weighted_field("sku", 2.0, |p| Some(p.sku.as_str()))
///     .field("description", |p| p.description.as_deref())
///     .build()
///     .unwrap();
///
/// let items = vec![
///     Product { name: "Laptop".into(), sku: "LP-1".into(), description: None },
///     Product { name: "Desk".into(), sku: "DK-1".into(), description: Some("for your laptop".into()) },
/// ];
///
/// let results = engine.search(&items, "laptop", 10);
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].item.name, "Laptop");
/// ```
pub struct SearchEngine<T> {
    fields: Vec<SearchField<T>>,
    max_results: usize,
}

impl<T> fmt::Debug for SearchEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("fields", &self.fields)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl<T> SearchEngine<T> {
    /// Start building an engine.
    pub fn builder() -> SearchEngineBuilder<T> {
        SearchEngineBuilder::new()
    }

    /// Create an engine from fields, with [`DEFAULT_MAX_RESULTS`].
    ///
    /// # Errors
    /// Fails when no fields are given, a name is blank or repeated, or a
    /// weight is not positive and finite.
    pub fn new(fields: Vec<SearchField<T>>) -> Result<Self> {
        Self::with_max_results(fields, DEFAULT_MAX_RESULTS)
    }

    /// Create an engine with a custom default result cap.
    ///
    /// # Errors
    /// Same as [`SearchEngine::new`], plus a zero `max_results`.
    pub fn with_max_results(fields: Vec<SearchField<T>>, max_results: usize) -> Result<Self> {
        validate_fields(&fields)?;
        if max_results == 0 {
            return Err(SearchError::InvalidMaxResults);
        }

        tracing::debug!(
            fields = fields.len(),
            max_results,
            "Search engine configured"
        );

        Ok(Self { fields, max_results })
    }

    /// Configured fields, in declaration order.
    pub fn fields(&self) -> &[SearchField<T>] {
        &self.fields
    }

    /// Default cap used by [`SearchEngine::search_default`].
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Weighted score of one item against a raw query, in `[0, 1]`.
    ///
    /// Returns 0.0 for a blank query.
    pub fn score(&self, item: &T, query: &str) -> f64 {
        self.score_normalized(item, &normalize(query))
    }

    fn score_normalized(&self, item: &T, normalized_query: &str) -> f64 {
        let mut total_score = 0.0;
        let mut total_weight = 0.0;

        for field in &self.fields {
            let text = field.accessor.field_text(item).unwrap_or_default();
            let normalized = normalize(&text);

            // Missing optional fields must not dilute the score.
            if normalized.is_empty() {
                continue;
            }

            total_score += fuzzy_score(normalized_query, &normalized) * field.weight;
            total_weight += field.weight;
        }

        if total_weight > 0.0 {
            total_score / total_weight
        } else {
            0.0
        }
    }
}

impl<T: Sync> SearchEngine<T> {
    /// Rank `items` against `query`, returning at most `max_results` hits.
    ///
    /// A blank query returns the first `max_results` items unranked with a
    /// score of 0.0 (browse mode). Otherwise only items with a positive
    /// score are returned, best first; equal scores keep input order.
    pub fn search<'a>(&self, items: &'a [T], query: &str, max_results: usize) -> Vec<SearchResult<'a, T>> {
        let normalized_query = normalize(query);

        if normalized_query.is_empty() {
            return items
                .iter()
                .take(max_results)
                .map(|item| SearchResult { item, score: 0.0 })
                .collect();
        }

        let mut results = self.score_all(items, &normalized_query);

        // Stable: ties stay in candidate order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(max_results);

        tracing::trace!(
            query = %normalized_query,
            candidates = items.len(),
            returned = results.len(),
            "Search completed"
        );

        results
    }

    /// [`SearchEngine::search`] with the engine's default cap.
    pub fn search_default<'a>(&self, items: &'a [T], query: &str) -> Vec<SearchResult<'a, T>> {
        self.search(items, query, self.max_results)
    }

    fn score_all<'a>(&self, items: &'a [T], normalized_query: &str) -> Vec<SearchResult<'a, T>> {
        let score_one = |item: &'a T| {
            let score = self.score_normalized(item, normalized_query);
            (score > 0.0).then_some(SearchResult { item, score })
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            items.par_iter().filter_map(score_one).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            items.iter().filter_map(score_one).collect()
        }
    }
}

fn validate_fields<T>(fields: &[SearchField<T>]) -> Result<()> {
    if fields.is_empty() {
        return Err(SearchError::NoFields);
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(SearchError::EmptyFieldName);
        }
        if !field.weight.is_finite() || field.weight <= 0.0 {
            return Err(SearchError::InvalidWeight {
                field: field.name.clone(),
                weight: field.weight,
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SearchError::DuplicateField(field.name.clone()));
        }
    }

    Ok(())
}

/// Builder for [`SearchEngine`].
pub struct SearchEngineBuilder<T> {
    fields: Vec<SearchField<T>>,
    max_results: usize,
}

impl<T> Default for SearchEngineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchEngineBuilder<T> {
    /// Empty builder with [`DEFAULT_MAX_RESULTS`].
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Add a field with [`DEFAULT_FIELD_WEIGHT`].
    #[must_use]
    pub fn field<F>(self, name: impl Into<String>, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a str> + Send + Sync + 'static,
    {
        self.weighted_field(name, DEFAULT_FIELD_WEIGHT, accessor)
    }

    /// Add a weighted field read by a closure.
    #[must_use]
    pub fn weighted_field<F>(self, name: impl Into<String>, weight: f64, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a str> + Send + Sync + 'static,
    {
        self.accessor_field(name, weight, accessor)
    }

    /// Add a weighted field read by any [`FieldAccessor`].
    #[must_use]
    pub fn accessor_field(
        mut self,
        name: impl Into<String>,
        weight: f64,
        accessor: impl FieldAccessor<T> + 'static,
    ) -> Self {
        self.fields
            .push(SearchField::new(name, accessor).with_weight(weight));
        self
    }

    /// Set the default result cap.
    #[must_use]
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Validate and build the engine.
    ///
    /// # Errors
    /// See [`SearchEngine::with_max_results`].
    pub fn build(self) -> Result<SearchEngine<T>> {
        SearchEngine::with_max_results(self.fields, self.max_results)
    }
}
