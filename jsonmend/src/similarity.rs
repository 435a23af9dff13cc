//! String similarity scoring for partial and fuzzy key matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds a key for comparison: NFKD-normalize, drop combining marks, lowercase.
fn fold(s: &str) -> Vec<char> {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Length of the longest common subsequence of two char sequences.
///
/// Classic dynamic programming, two rolling rows.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for c1 in a {
        for (j, c2) in b.iter().enumerate() {
            curr[j + 1] = if c1 == c2 {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Computes a case-insensitive similarity score between two strings.
///
/// The score is the longest-common-subsequence ratio `2*lcs / (|a| + |b|)`,
/// bounded to `[0.0, 1.0]`. Identical strings (after folding) score 1.0;
/// strings with no characters in common score 0.0. Two empty strings are
/// considered identical.
///
/// # Examples
///
/// ```
/// use jsonmend::similarity::similarity;
///
/// assert_eq!(similarity("id", "ID"), 1.0);
/// assert!(similarity("username", "user_name") > 0.9);
/// assert_eq!(similarity("abc", "xyz"), 0.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = fold(a);
    let b = fold(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let lcs = lcs_len(&a, &b) as f64;
    2.0 * lcs / (a.len() + b.len()) as f64
}
