//! Normalized edit-distance similarity.

/// Similarity in `[0, 1]`: `1 - levenshtein(a, b) / max(len(a), len(b), 1)`.
///
/// Lengths and edits are counted in Unicode scalar values. The score is
/// symmetric, `1.0` for identical inputs (including two empty strings) and
/// strictly below `1.0` when exactly one side is empty.
#[allow(clippy::cast_precision_loss)]
pub fn score(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len()).max(1);

    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// Character-level Levenshtein distance.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    // Keep the shorter side in the row to bound memory.
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    let n = b.len();

    if n == 0 {
        return a.len();
    }

    // Two-row optimisation.
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
