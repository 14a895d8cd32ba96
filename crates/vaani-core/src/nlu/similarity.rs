//! Order-independent string similarity on a 0–100 scale.
//!
//! `token_set_ratio` compares the sets of whitespace tokens of two strings, so
//! "karo light on" and "light on karo" score 100, and an utterance that
//! contains every word of an exemplar (or vice versa) also scores 100.
//! Character-level comparison uses the indel ratio
//! `100 * (1 - indel_distance / (len_a + len_b))`, where
//! `indel_distance = len_a + len_b - 2 * LCS` over Unicode scalar values.

use std::collections::BTreeSet;

/// Indel similarity of two strings, 0–100. Two empty strings score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    let distance = total - 2 * lcs_len(&a, &b);
    normalized_similarity(distance, total)
}

/// Token-set similarity of two strings, 0–100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side's words are all contained in the other.
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined: Vec<char> = diff_ab.join(" ").chars().collect();
    let diff_ba_joined: Vec<char> = diff_ba.join(" ").chars().collect();
    let ab_len = diff_ab_joined.len();
    let ba_len = diff_ba_joined.len();

    let sect_len = intersection.join(" ").chars().count();
    let separator = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + separator + ab_len;
    let sect_ba_len = sect_len + separator + ba_len;

    let distance = ab_len + ba_len - 2 * lcs_len(&diff_ab_joined, &diff_ba_joined);
    let diff_score = normalized_similarity(distance, sect_ab_len + sect_ba_len);

    if sect_len == 0 {
        return diff_score;
    }

    // "sect" against "sect + diff" only differs by the appended words.
    let sect_ab_score = normalized_similarity(separator + ab_len, sect_len + sect_ab_len);
    let sect_ba_score = normalized_similarity(separator + ba_len, sect_len + sect_ba_len);

    diff_score.max(sect_ab_score).max(sect_ba_score)
}

fn normalized_similarity(distance: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        return 100.0;
    }
    100.0 * (1.0 - distance as f64 / total_len as f64)
}

/// Longest common subsequence length, single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_ratio() {
        assert!(approx(ratio("this is a test", "this is a test!"), 96.55));
        assert!(approx(ratio("", ""), 100.0));
        assert!(approx(ratio("abc", ""), 0.0));
        assert!(approx(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_lcs() {
        let a: Vec<char> = "mosam".chars().collect();
        let b: Vec<char> = "mausam".chars().collect();
        assert_eq!(lcs_len(&a, &b), 4);
    }

    #[test]
    fn test_word_order_is_ignored() {
        assert!(approx(
            token_set_ratio("karo light on living room ki", "living room ki light on karo"),
            100.0
        ));
        assert!(approx(token_set_ratio("जलाओ बत्ती", "बत्ती जलाओ"), 100.0));
    }

    #[test]
    fn test_subset_scores_full() {
        assert!(approx(token_set_ratio("batti band kar do jaldi", "batti band kar do"), 100.0));
        assert!(approx(token_set_ratio("fuzzy wuzzy was a bear", "fuzzy fuzzy was a bear"), 100.0));
    }

    #[test]
    fn test_transcription_typo() {
        // sect = "hai kaisa", diffs "mosam" / "mausam", indel distance 3
        let score = token_set_ratio("mosam kaisa hai", "mausam kaisa hai");
        assert!(approx(score, 90.32), "got {score}");
    }

    #[test]
    fn test_no_shared_tokens() {
        let score = token_set_ratio("abc", "abd");
        // diff strings only: 2 * 2 / 6
        assert!(approx(score, 66.67), "got {score}");
    }

    #[test]
    fn test_empty_side_scores_zero() {
        assert!(approx(token_set_ratio("", "batti jalao"), 0.0));
        assert!(approx(token_set_ratio("batti", "   "), 0.0));
    }

    #[test]
    fn test_symmetric() {
        let a = "kal subah meeting ka reminder";
        let b = "reminder lagao";
        assert!(approx(token_set_ratio(a, b), token_set_ratio(b, a)));
    }
}
