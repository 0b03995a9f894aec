//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised while building a search engine.
///
/// Searching itself never fails; every variant here is a configuration
/// problem detected at construction time.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    /// Engine built without any searchable field
    #[error("Search engine requires at least one field")]
    NoFields,

    /// Field name declared more than once
    #[error("Duplicate search field: {0}")]
    DuplicateField(String),

    /// Field name is blank
    #[error("Search field name must not be empty")]
    EmptyFieldName,

    /// Weight is zero, negative, NaN or infinite
    #[error("Invalid weight {weight} for field '{field}': weights must be positive and finite")]
    InvalidWeight {
        /// Field the weight belongs to
        field: String,
        /// Rejected weight
        weight: f64,
    },

    /// Default result limit of zero
    #[error("Default max results must be greater than zero")]
    InvalidMaxResults,
}

/// Error code for integration with catalog-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// No fields configured
    NoFields = 11001,
    /// Duplicate field name
    DuplicateField = 11002,
    /// Blank field name
    EmptyFieldName = 11003,
    /// Invalid field weight
    InvalidWeight = 11004,
    /// Invalid result limit
    InvalidMaxResults = 11005,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::NoFields => SearchErrorCode::NoFields,
            SearchError::DuplicateField(_) => SearchErrorCode::DuplicateField,
            SearchError::EmptyFieldName => SearchErrorCode::EmptyFieldName,
            SearchError::InvalidWeight { .. } => SearchErrorCode::InvalidWeight,
            SearchError::InvalidMaxResults => SearchErrorCode::InvalidMaxResults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SearchError::NoFields.code() as u32, 11001);
        assert_eq!(
            SearchError::InvalidWeight { field: "name".into(), weight: -1.0 }.code(),
            SearchErrorCode::InvalidWeight
        );
    }

    #[test]
    fn test_error_display() {
        let err = SearchError::DuplicateField("sku".into());
        assert_eq!(err.to_string(), "Duplicate search field: sku");
    }
}
