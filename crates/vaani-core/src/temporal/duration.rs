//! Relative durations: "5 minute", "पांच मिनट", "aadha ghanta".

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed phrase → whole-minute table.
pub const DURATION_TABLE: &[(&str, u32)] = &[
    ("एक मिनट", 1),
    ("1 मिनट", 1),
    ("दो मिनट", 2),
    ("2 मिनट", 2),
    ("तीन मिनट", 3),
    ("3 मिनट", 3),
    ("चार मिनट", 4),
    ("4 मिनट", 4),
    ("पांच मिनट", 5),
    ("पाँच मिनट", 5),
    ("5 मिनट", 5),
    ("दस मिनट", 10),
    ("10 मिनट", 10),
    ("पंद्रह मिनट", 15),
    ("15 मिनट", 15),
    ("बीस मिनट", 20),
    ("20 मिनट", 20),
    ("तीस मिनट", 30),
    ("30 मिनट", 30),
    ("आधा घंटा", 30),
    ("आधे घंटे", 30),
    ("एक घंटा", 60),
    ("एक घंटे", 60),
    ("ek minute", 1),
    ("1 minute", 1),
    ("do minute", 2),
    ("2 minute", 2),
    ("teen minute", 3),
    ("3 minute", 3),
    ("char minute", 4),
    ("4 minute", 4),
    ("paanch minute", 5),
    ("panch minute", 5),
    ("5 minute", 5),
    ("das minute", 10),
    ("10 minute", 10),
    ("pandrah minute", 15),
    ("15 minute", 15),
    ("bees minute", 20),
    ("20 minute", 20),
    ("tees minute", 30),
    ("30 minute", 30),
    ("aadha ghanta", 30),
    ("aadhe ghante", 30),
    ("half an hour", 30),
    ("ek ghanta", 60),
    ("ek ghante", 60),
    ("one hour", 60),
    ("do ghante", 120),
];

// "<digits> <unit>" for amounts the table does not list.
static NUMERIC_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|\s)(\d{1,4})\s*(minutes|minute|mins|min|mint|मिनट|ghante|ghanta|ghanton|hours|hour|hrs|घंटे|घंटा|घंटों)(?:\s|$)",
    )
    .unwrap()
});

/// Minutes for the duration phrase in `text`, if any.
///
/// Table phrases only match on whole-word boundaries; when several match the
/// longest phrase wins. Falls back to a bare number followed by a minute or
/// hour unit. Zero-length durations are ignored.
pub fn extract_minutes(text: &str) -> Option<u32> {
    let padded = format!(" {} ", text.split_whitespace().collect::<Vec<_>>().join(" "));

    let from_table = DURATION_TABLE
        .iter()
        .filter(|(phrase, _)| padded.contains(&format!(" {} ", phrase)))
        .max_by_key(|(phrase, _)| phrase.chars().count())
        .map(|(_, minutes)| *minutes);

    if from_table.is_some() {
        return from_table;
    }

    let cap = NUMERIC_DURATION.captures(text)?;
    let amount: u32 = cap[1].parse().ok()?;
    let minutes = match &cap[2] {
        "ghante" | "ghanta" | "ghanton" | "hours" | "hour" | "hrs" | "घंटे" | "घंटा" | "घंटों" => {
            amount.checked_mul(60)?
        }
        _ => amount,
    };

    (minutes > 0).then_some(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_phrase_maps_exactly() {
        for (phrase, minutes) in DURATION_TABLE {
            let text = format!("{} ka alarm lagao", phrase);
            assert_eq!(extract_minutes(&text), Some(*minutes), "phrase {phrase}");
        }
    }

    #[test]
    fn test_longer_phrase_wins() {
        assert_eq!(extract_minutes("15 minute ka alarm"), Some(15));
        assert_eq!(extract_minutes("15 मिनट बाद"), Some(15));
        assert_eq!(extract_minutes("आधे घंटे बाद"), Some(30));
    }

    #[test]
    fn test_numeric_fallback() {
        assert_eq!(extract_minutes("45 minute baad"), Some(45));
        assert_eq!(extract_minutes("3 ghante baad yaad dilana"), Some(180));
        assert_eq!(extract_minutes("7 मिनट"), Some(7));
    }

    #[test]
    fn test_no_duration() {
        assert_eq!(extract_minutes("alarm lagao"), None);
        assert_eq!(extract_minutes("0 minute"), None);
        assert_eq!(extract_minutes("kal subah meeting"), None);
    }

    #[test]
    fn test_embedded_word_does_not_match() {
        // "do minute" must not match inside another word
        assert_eq!(extract_minutes("kardo minutes"), None);
    }
}
