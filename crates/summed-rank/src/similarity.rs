//! Normalized string similarity on a 0-100 scale.

/// Indel-based Levenshtein ratio of two strings, in `[0, 100]`.
///
/// Only insertions and deletions count as edits, so the ratio is
/// `100 * (|a| + |b| - indel) / (|a| + |b|)`, equivalently
/// `200 * lcs / (|a| + |b|)`. Two empty strings are identical (100).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    (2 * lcs_len(&a, &b)) as f64 * 100.0 / total as f64
}

/// Length of the longest common subsequence, single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; short.len() + 1];
    for &lc in long {
        let mut diag = 0;
        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc { diag + 1 } else { above.max(row[j]) };
            diag = above;
        }
    }
    row[short.len()]
}
