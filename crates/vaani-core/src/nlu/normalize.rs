//! Text normalization for transcribed utterances.
//!
//! Keeps word characters, whitespace and the Devanagari block (U+0900–U+097F,
//! which includes matras, nukta and danda); drops all other punctuation.

use once_cell::sync::Lazy;
use regex::Regex;

static NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\u{0900}-\u{097F}]").unwrap());

/// Normalize a raw utterance: strip noise, lowercase, trim.
///
/// Never fails; empty or all-punctuation input yields an empty string.
pub fn normalize_text(text: &str) -> String {
    let stripped = NOISE.replace_all(text, "");
    stripped.to_lowercase().trim().to_string()
}
