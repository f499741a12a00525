//! Substring-tolerant fuzzy scoring on a 0-100 scale.

use rapidfuzz::distance::indel;

/// Indel similarity of two strings, 0-100: `2 * LCS / (|a| + |b|)`.
pub fn ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

fn window_ratio(short: &[char], window: &[char]) -> f64 {
    indel::normalized_similarity(short.iter().copied(), window.iter().copied()) * 100.0
}

/// Best [`ratio`] of the shorter string against any same-length window of the
/// longer one, including windows that hang off either end.
///
/// An exact substring scores 100. Comparison is case-sensitive. Returns 0 when
/// either side is empty.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };
    let (m, n) = (short.len(), long.len());

    if m == n {
        return window_ratio(&short, &long);
    }

    let score_window = |window: &[char]| window_ratio(&short, window);

    let mut best = 0.0_f64;
    for start in 0..=(n - m) {
        best = best.max(score_window(&long[start..start + m]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    for k in 1..m {
        best = best.max(score_window(&long[..k]));
        best = best.max(score_window(&long[n - k..]));
    }
    best
}

/// Score every choice against `query`, highest first.
///
/// Ties keep the input order. Returns `(index, score)` pairs, at most `limit`.
pub fn extract<S: AsRef<str>>(query: &str, choices: &[S], limit: usize) -> Vec<(usize, f64)> {
    let mut scored: Vec<(usize, f64)> = choices
        .iter()
        .enumerate()
        .map(|(i, choice)| (i, partial_ratio(query, choice.as_ref())))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored
}
