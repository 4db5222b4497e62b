//! Token and window similarity measures.

/// Similarity of two normalized tokens in `[0.0, 1.0]`.
///
/// One minus the Levenshtein distance over characters, divided by the
/// longer token's length.
pub fn token_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return if a.is_empty() { 0.0 } else { 1.0 };
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 || a.is_empty() || b.is_empty() {
        return 0.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}

/// Dice-style score from a (weighted) common-subsequence length.
///
/// `2·common / (turn_len + window_len)`, so both missing and extra words
/// pull the score down.
pub fn overlap_score(common: f64, turn_len: usize, window_len: usize) -> f64 {
    let total = turn_len + window_len;
    if total == 0 {
        return 0.0;
    }
    (2.0 * common / total as f64).clamp(0.0, 1.0)
}

/// Extend a weighted-LCS column by one window token.
///
/// `prev[i]` is the best common weight between the first `i` turn tokens and
/// the window so far; the returned column includes one more window token
/// whose weight against turn token `i` is `weight(i)`.
pub(crate) fn lcs_step(prev: &[f64], weight: impl Fn(usize) -> f64) -> Vec<f64> {
    let mut cur = vec![0.0_f64; prev.len()];
    for i in 1..prev.len() {
        let w = weight(i - 1);
        let diagonal = if w > 0.0 { prev[i - 1] + w } else { 0.0 };
        cur[i] = prev[i].max(cur[i - 1]).max(diagonal);
    }
    cur
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_tokens() {
        assert_eq!(token_similarity("voce", "voce"), 1.0);
        assert_eq!(token_similarity("", ""), 0.0);
    }

    #[test]
    fn test_near_tokens() {
        // one substitution in five characters
        assert!((token_similarity("falar", "falam") - 0.8).abs() < 1e-12);
        assert!(token_similarity("casa", "xyz") < 0.3);
        assert_eq!(token_similarity("casa", ""), 0.0);
    }

    #[test]
    fn test_levenshtein() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(levenshtein(&a, &b), 3);
    }

    #[test]
    fn test_lcs_step_exact() {
        let turn = ["a", "b", "c"];
        let window = ["x", "a", "c"];
        let mut column = vec![0.0; turn.len() + 1];
        for token in window {
            column = lcs_step(&column, |i| if turn[i] == token { 1.0 } else { 0.0 });
        }
        let common = column[turn.len()];
        assert!((common - 2.0).abs() < 1e-12);
        assert!((overlap_score(common, 3, 3) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_score_bounds() {
        assert_eq!(overlap_score(0.0, 0, 0), 0.0);
        assert_eq!(overlap_score(3.0, 3, 3), 1.0);
    }
}
