//! Edit distance.

/// Calculate Levenshtein edit distance between two strings.
///
/// Distance is counted in characters (not bytes) with unit cost for
/// insertion, deletion and substitution. The full `(|a|+1) x (|b|+1)`
/// table is materialized, so time and memory are O(|a|·|b|): fine for
/// catalog field text, not meant for documents.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Number of single-character edits needed to transform a into b
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    levenshtein_chars(&a_chars, &b_chars)
}

/// Levenshtein distance over pre-split characters.
pub(crate) fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    let width = n + 1;
    let mut table = vec![0usize; (m + 1) * width];

    for i in 0..=m {
        table[i * width] = i;
    }
    for j in 0..=n {
        table[j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            table[i * width + j] = (table[(i - 1) * width + j] + 1)
                .min(table[i * width + j - 1] + 1)
                .min(table[(i - 1) * width + j - 1] + cost);
        }
    }

    table[m * width + n]
}
