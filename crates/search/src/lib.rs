//! Weighted multi-field fuzzy search for catalog items.
//!
//! This crate provides:
//! - Diacritic-insensitive text normalization
//! - Levenshtein edit distance
//! - Tiered relevance scoring (exact, contains, fuzzy substring, similarity)
//! - A generic search engine ranking items across weighted fields
//!
//! # Example
//!
//! ```
//! use catalog_search::{fuzzy_score, normalize};
//!
//! let query = normalize("Café");
//! assert_eq!(fuzzy_score(&query, &normalize("CAFE")), 1.0);
//! assert_eq!(fuzzy_score(&query, &normalize("Cafe au lait")), 0.8);
//! ```

mod engine;
mod error;
mod fuzzy;
mod normalize;
pub mod relevance;

pub use engine::{
    FieldAccessor, SearchEngine, SearchEngineBuilder, SearchField, SearchResult,
    DEFAULT_FIELD_WEIGHT, DEFAULT_MAX_RESULTS,
};
pub use error::{Result, SearchError, SearchErrorCode};
pub use fuzzy::levenshtein_distance;
pub use normalize::normalize;
pub use relevance::{classify_match, fuzzy_score, MatchTier};
