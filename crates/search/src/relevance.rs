//! Tiered relevance scoring for a single query/field pair.
//!
//! Tiers are checked in order and the first hit wins:
//!
//! | Tier              | Condition                                         | Score           |
//! |-------------------|---------------------------------------------------|-----------------|
//! | `Exact`           | text equals query                                 | 1.0             |
//! | `Contains`        | text contains query                               | 0.8             |
//! | `FuzzySubstring`  | some query-sized window is within tolerance       | 0.6             |
//! | `Similar`         | whole-string similarity above 0.3                 | similarity × 0.4|
//! | `None`            | anything else                                     | 0.0             |
//!
//! The edit-distance tier is capped at 0.4 so it never outranks a substring hit.

use crate::fuzzy::levenshtein_chars;

/// Score for an exact match.
pub const EXACT_SCORE: f64 = 1.0;
/// Score when the text contains the query.
pub const CONTAINS_SCORE: f64 = 0.8;
/// Score when a window of the text is within edit tolerance of the query.
pub const FUZZY_SUBSTRING_SCORE: f64 = 0.6;
/// Multiplier applied to whole-string similarity.
pub const SIMILARITY_DAMPING: f64 = 0.4;
/// Similarity must exceed this to score at all.
pub const SIMILARITY_FLOOR: f64 = 0.3;
/// Allowed window edits as a fraction of query length, rounded up.
pub const FUZZY_TOLERANCE_RATIO: f64 = 0.3;

/// Which scoring tier matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchTier {
    /// No match
    None,
    /// Whole-string similarity (carries the similarity in `(0.3, 1.0]`)
    Similar(f64),
    /// Approximate substring
    FuzzySubstring,
    /// Contains substring
    Contains,
    /// Exact match
    Exact,
}

impl MatchTier {
    /// Score contributed by this tier, in `[0, 1]`.
    pub fn score(self) -> f64 {
        match self {
            MatchTier::Exact => EXACT_SCORE,
            MatchTier::Contains => CONTAINS_SCORE,
            MatchTier::FuzzySubstring => FUZZY_SUBSTRING_SCORE,
            MatchTier::Similar(similarity) => similarity * SIMILARITY_DAMPING,
            MatchTier::None => 0.0,
        }
    }
}

/// Determine the matching tier for a normalized query against normalized text.
///
/// Both inputs are expected to have gone through [`crate::normalize`].
/// An empty query or empty text never matches.
pub fn classify_match(query: &str, text: &str) -> MatchTier {
    if query.is_empty() || text.is_empty() {
        return MatchTier::None;
    }

    if text == query {
        return MatchTier::Exact;
    }

    if text.contains(query) {
        return MatchTier::Contains;
    }

    let query_chars: Vec<char> = query.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    if is_fuzzy_substring(&query_chars, &text_chars) {
        return MatchTier::FuzzySubstring;
    }

    let distance = levenshtein_chars(&query_chars, &text_chars);
    let max_len = query_chars.len().max(text_chars.len());
    let similarity = 1.0 - distance as f64 / max_len as f64;

    if similarity > SIMILARITY_FLOOR {
        MatchTier::Similar(similarity)
    } else {
        MatchTier::None
    }
}

/// Score a normalized query against normalized text, in `[0, 1]`.
///
/// # Example
/// ```
/// use catalog_search::fuzzy_score;
///
/// assert_eq!(fuzzy_score("laptop", "laptop"), 1.0);
/// assert_eq!(fuzzy_score("laptop", "gaming laptop"), 0.8);
/// assert_eq!(fuzzy_score("laptop", "leptop stand"), 0.6);
/// ```
pub fn fuzzy_score(query: &str, text: &str) -> f64 {
    classify_match(query, text).score()
}

/// Any window of `text` (length `min(|query|, |text|)`) within
/// `ceil(0.3 * |query|)` edits of the query.
fn is_fuzzy_substring(query: &[char], text: &[char]) -> bool {
    let window = query.len().min(text.len());
    if window == 0 {
        return false;
    }

    let tolerance = (query.len() as f64 * FUZZY_TOLERANCE_RATIO).ceil() as usize;

    text.windows(window)
        .any(|candidate| levenshtein_chars(query, candidate) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use proptest::prelude::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(classify_match("laptop", "laptop"), MatchTier::Exact);
        assert_eq!(fuzzy_score("laptop", "laptop"), 1.0);
    }

    #[test]
    fn test_exact_after_normalization() {
        let query = normalize("Café");
        let text = normalize("  CAFE ");
        assert_eq!(fuzzy_score(&query, &text), 1.0);
    }

    #[test]
    fn test_contains() {
        assert_eq!(classify_match("laptop", "gaming laptop"), MatchTier::Contains);
        assert_eq!(fuzzy_score("top", "laptop"), 0.8);
    }

    #[test]
    fn test_fuzzy_substring() {
        assert_eq!(classify_match("laptop", "leptop stand"), MatchTier::FuzzySubstring);
        assert_eq!(fuzzy_score("laptop", "my lapttop bag"), 0.6);
    }

    #[test]
    fn test_fuzzy_substring_query_longer_than_text() {
        // Single window spanning the whole text, one edit away.
        assert_eq!(classify_match("laptops", "laptop"), MatchTier::FuzzySubstring);
    }

    #[test]
    fn test_similarity_tier() {
        // distance 3 over 6 chars: outside window tolerance of 2, similarity 0.5
        let tier = classify_match("abcdef", "abcxyz");
        assert_eq!(tier, MatchTier::Similar(0.5));
        assert!((fuzzy_score("abcdef", "abcxyz") - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_below_floor() {
        assert_eq!(classify_match("abc", "xyz"), MatchTier::None);
        assert_eq!(fuzzy_score("laptop", "x"), 0.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(fuzzy_score("", "laptop"), 0.0);
        assert_eq!(fuzzy_score("laptop", ""), 0.0);
        assert_eq!(fuzzy_score("", ""), 0.0);
    }

    #[test]
    fn test_tolerance_rounds_up() {
        // |query| = 4 allows ceil(1.2) = 2 edits
        assert_eq!(classify_match("abcd", "abxy"), MatchTier::FuzzySubstring);
        assert_eq!(classify_match("abcd", "axyz"), MatchTier::None);
    }

    #[test]
    fn test_tier_ordering() {
        let similar = MatchTier::Similar(1.0).score();
        assert!(EXACT_SCORE > CONTAINS_SCORE);
        assert!(CONTAINS_SCORE > FUZZY_SUBSTRING_SCORE);
        assert!(FUZZY_SUBSTRING_SCORE > similar);
    }

    proptest! {
        #[test]
        fn prop_self_match_is_exact(q in "[a-zA-Zéèü ]{1,16}") {
            let n = normalize(&q);
            prop_assume!(!n.is_empty());
            prop_assert_eq!(fuzzy_score(&n, &n), 1.0);
        }

        #[test]
        fn prop_strict_superstring_scores_contains(
            q in "[a-z]{1,8}",
            prefix in "[a-z ]{0,5}",
            suffix in "[a-z ]{0,5}",
        ) {
            let text = format!("{prefix}{q}{suffix}");
            prop_assume!(text != q);
            prop_assert_eq!(fuzzy_score(&q, &text), CONTAINS_SCORE);
        }

        #[test]
        fn prop_score_in_unit_range(q in "[a-z ]{0,10}", t in "[a-z ]{0,14}") {
            let s = fuzzy_score(&q, &t);
            prop_assert!(s.is_finite());
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }
}
