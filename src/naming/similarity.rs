//! Levenshtein-based string similarity.
//!
//! This is the last-resort similarity signal, consulted only after the
//! higher-precedence equality tests (exact, core-entity, variant,
//! containment) have failed.

/// Normalized similarity between two names in `[0, 1]`.
///
/// Both operands are upper-cased with `_` and `-` folded out before the
/// edit distance is taken. Identical strings return 1.0; an empty operand
/// returns 0.0.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_norm = fold(a);
    let b_norm = fold(b);
    if a_norm == b_norm {
        return 1.0;
    }
    let max_len = a_norm.chars().count().max(b_norm.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let distance = levenshtein(&a_norm, &b_norm);
    (1.0 - distance as f64 / max_len as f64).max(0.0)
}

fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Classic two-row Levenshtein distance.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
