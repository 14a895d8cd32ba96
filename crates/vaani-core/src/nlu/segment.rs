//! Splits one normalized utterance into independent command segments.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Conjunctions that separate commands: Devanagari, romanized, English.
pub const CONJUNCTIONS: &[&str] = &[
    "और", "तथा", "फिर", "aur", "tatha", "phir", "fir", "and", "also", "then",
];

static CONJUNCTION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CONJUNCTIONS.iter().copied().collect());

/// Split on conjunction tokens.
///
/// Conjunctions are dropped, as are empty fragments, so "x aur phir y" and a
/// leading or trailing conjunction do not produce stray segments. Words inside
/// a segment are joined with single spaces. Order follows the utterance.
pub fn split_commands(normalized: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in normalized.split_whitespace() {
        if CONJUNCTION_SET.contains(token) {
            if !current.is_empty() {
                segments.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(token);
        }
    }

    if !current.is_empty() {
        segments.push(current.join(" "));
    }

    segments
}
