//! Text normalization applied to queries and field values before matching.

use unicode_normalization::char::decompose_canonical;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Normalize text for matching: lowercase, strip diacritics, trim.
///
/// Each character is replaced by the base characters of its canonical
/// decomposition with non-spacing marks (general category Mn) dropped, so
/// `"Café"` and `"cafe"` normalize identically. Spacing and enclosing marks
/// are kept, as are characters whose decomposition carries no non-spacing
/// mark (Hangul syllables, Indic vowel signs, CJK).
///
/// Never fails; empty input yields an empty string.
///
/// # Example
/// ```
/// use catalog_search::normalize;
///
/// assert_eq!(normalize("  Crème Brûlée "), "creme brulee");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut folded = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        push_base_form(c, &mut folded);
    }

    // Trim last: stripping a leading mark can expose whitespace.
    let trimmed = folded.trim();
    if trimmed.len() == folded.len() {
        folded
    } else {
        trimmed.to_string()
    }
}

fn is_nonspacing_mark(c: char) -> bool {
    c.general_category() == GeneralCategory::NonspacingMark
}

fn push_base_form(c: char, out: &mut String) {
    let mut parts = [c; 4];
    let mut len = 0;
    let mut has_mark = false;

    decompose_canonical(c, |part| {
        if is_nonspacing_mark(part) {
            has_mark = true;
        } else if len < parts.len() {
            parts[len] = part;
            len += 1;
        }
    });

    if has_mark {
        out.extend(&parts[..len]);
    } else {
        out.push(c);
    }
}
