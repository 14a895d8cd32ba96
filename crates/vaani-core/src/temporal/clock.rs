//! Clock-time phrases for absolute scheduling.
//!
//! Works on normalized, whitespace-tokenized text:
//! - day offset: "aaj" / "kal" / "parso" and their Devanagari and English forms
//! - explicit hour: "6 baje", "छह बजे", "7 pm", "6 baj kar 20 minute", "630 baje"
//! - fractions: "saade 6" (6:30), "sava 6" (6:15), "paune 6" (5:45), "dedh" (1:30)
//! - day part: "subah", "dopahar", "shaam", "raat" shift a 12-hour reading

use serde::{Deserialize, Serialize};

/// Hour used when neither an explicit time nor a day part is given.
pub const DEFAULT_HOUR: u32 = 10;

/// Coarse part of the day named in an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

const DAY_PART_WORDS: &[(DayPart, &[&str])] = &[
    (
        DayPart::Morning,
        &["subah", "subha", "सुबह", "savere", "सवेरे", "morning"],
    ),
    (
        DayPart::Afternoon,
        &["dopahar", "dopehar", "दोपहर", "afternoon", "noon"],
    ),
    (DayPart::Evening, &["shaam", "sham", "शाम", "evening"]),
    (DayPart::Night, &["raat", "rat", "रात", "night", "tonight"]),
];

impl DayPart {
    /// First day part mentioned in `tokens`, by table order.
    pub fn detect(tokens: &[&str]) -> Option<Self> {
        DAY_PART_WORDS
            .iter()
            .find(|(_, words)| tokens.iter().any(|t| words.contains(t)))
            .map(|(part, _)| *part)
    }

    /// Hour used when only the day part is known.
    pub fn default_hour(self) -> u32 {
        match self {
            DayPart::Morning => 9,
            DayPart::Afternoon => 13,
            DayPart::Evening => 18,
            DayPart::Night => 21,
        }
    }

    /// Map a 12-hour reading into 24-hour time. Hours above 12 pass through.
    pub fn adjust(self, hour: u32) -> u32 {
        if hour > 12 {
            return hour;
        }
        match self {
            DayPart::Morning if hour == 12 => 0,
            DayPart::Morning => hour,
            DayPart::Afternoon | DayPart::Evening if (1..=11).contains(&hour) => hour + 12,
            DayPart::Afternoon | DayPart::Evening => hour,
            DayPart::Night if (5..=11).contains(&hour) => hour + 12,
            DayPart::Night if hour == 12 => 0,
            DayPart::Night => hour,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn adjust(self, hour: u32) -> u32 {
        match self {
            Meridiem::Am if hour == 12 => 0,
            Meridiem::Pm if (1..=11).contains(&hour) => hour + 12,
            _ => hour,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fraction {
    HalfPast,
    QuarterPast,
    QuarterTo,
}

/// Spoken hour words with an optional built-in half hour.
const HOUR_WORDS: &[(&str, u32, u32)] = &[
    ("ek", 1, 0),
    ("एक", 1, 0),
    ("one", 1, 0),
    ("do", 2, 0),
    ("दो", 2, 0),
    ("two", 2, 0),
    ("teen", 3, 0),
    ("तीन", 3, 0),
    ("three", 3, 0),
    ("char", 4, 0),
    ("chaar", 4, 0),
    ("चार", 4, 0),
    ("four", 4, 0),
    ("paanch", 5, 0),
    ("panch", 5, 0),
    ("पांच", 5, 0),
    ("पाँच", 5, 0),
    ("five", 5, 0),
    ("chhe", 6, 0),
    ("chhah", 6, 0),
    ("che", 6, 0),
    ("छह", 6, 0),
    ("छः", 6, 0),
    ("six", 6, 0),
    ("saat", 7, 0),
    ("सात", 7, 0),
    ("seven", 7, 0),
    ("aath", 8, 0),
    ("आठ", 8, 0),
    ("eight", 8, 0),
    ("nau", 9, 0),
    ("नौ", 9, 0),
    ("nine", 9, 0),
    ("das", 10, 0),
    ("दस", 10, 0),
    ("ten", 10, 0),
    ("gyarah", 11, 0),
    ("gyara", 11, 0),
    ("ग्यारह", 11, 0),
    ("eleven", 11, 0),
    ("barah", 12, 0),
    ("bara", 12, 0),
    ("बारह", 12, 0),
    ("twelve", 12, 0),
    ("dedh", 1, 30),
    ("डेढ़", 1, 30),
    ("dhai", 2, 30),
    ("ढाई", 2, 30),
];

const HOUR_MARKERS: &[&str] = &["baje", "bje", "baaje", "बजे", "oclock", "am", "pm"];
const MINUTE_MARKERS: &[&str] = &["bajkar", "बजकर"];

/// Everything the clock parser could read from an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    /// 0 = today, 1 = tomorrow, 2 = day after tomorrow.
    pub day_offset: u32,
    /// 24-hour hour.
    pub hour: u32,
    pub minute: u32,
    /// False when the hour came from a day-part or global default.
    pub explicit_time: bool,
    pub day_part: Option<DayPart>,
}

/// Day offset named in `text`; longer horizons are checked first.
pub fn day_offset(text: &str) -> u32 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    day_offset_of(&tokens)
}

fn day_offset_of(tokens: &[&str]) -> u32 {
    let has = |words: &[&str]| tokens.iter().any(|t| words.contains(t));
    let day_after = tokens.windows(2).any(|pair| pair == ["day", "after"]);

    if day_after || has(&["parso", "parson", "parsoon", "परसों", "परसो"]) {
        2
    } else if has(&["kal", "कल", "tomorrow"]) {
        1
    } else {
        0
    }
}

/// Read day offset, hour and minute from normalized text.
pub fn read_clock(text: &str) -> ClockReading {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let day_offset = day_offset_of(&tokens);
    let day_part = DayPart::detect(&tokens);
    let meridiem = tokens.iter().rev().find_map(|t| match *t {
        "am" => Some(Meridiem::Am),
        "pm" => Some(Meridiem::Pm),
        _ => None,
    });
    let fraction = find_fraction(&tokens);

    let explicit = marked_time(&tokens).or_else(|| fraction.and_then(|(_, next)| {
        tokens.get(next).and_then(|t| parse_hour_token(t))
    }));

    let Some((raw_hour, raw_minute)) = explicit else {
        return ClockReading {
            day_offset,
            hour: day_part.map_or(DEFAULT_HOUR, DayPart::default_hour),
            minute: 0,
            explicit_time: false,
            day_part,
        };
    };

    let mut hour = match (meridiem, day_part) {
        (Some(m), _) => m.adjust(raw_hour),
        (None, Some(part)) => part.adjust(raw_hour),
        (None, None) => raw_hour,
    };
    let mut minute = raw_minute;

    if minute == 0 {
        match fraction.map(|(f, _)| f) {
            Some(Fraction::HalfPast) => minute = 30,
            Some(Fraction::QuarterPast) => minute = 15,
            Some(Fraction::QuarterTo) => {
                hour = (hour + 23) % 24;
                minute = 45;
            }
            None => {}
        }
    }

    ClockReading {
        day_offset,
        hour,
        minute,
        explicit_time: true,
        day_part,
    }
}

/// Fraction word and the index of the token expected to carry the hour.
fn find_fraction(tokens: &[&str]) -> Option<(Fraction, usize)> {
    for (i, token) in tokens.iter().enumerate() {
        let single = match *token {
            "saade" | "sade" | "sadhe" | "साढ़े" => Some(Fraction::HalfPast),
            "sava" | "sawa" | "सवा" => Some(Fraction::QuarterPast),
            "paune" | "pone" | "पौने" => Some(Fraction::QuarterTo),
            _ => None,
        };
        if let Some(fraction) = single {
            return Some((fraction, i + 1));
        }

        let english = match (*token, tokens.get(i + 1).copied()) {
            ("half", Some("past")) => Some(Fraction::HalfPast),
            ("quarter", Some("past")) => Some(Fraction::QuarterPast),
            ("quarter", Some("to")) => Some(Fraction::QuarterTo),
            _ => None,
        };
        if let Some(fraction) = english {
            return Some((fraction, i + 2));
        }
    }
    None
}

/// Hour (and minute) introduced by a marker such as "baje" or "bajkar".
fn marked_time(tokens: &[&str]) -> Option<(u32, u32)> {
    for (i, token) in tokens.iter().enumerate().skip(1) {
        let (hour_marker, minutes_follow, next) = if HOUR_MARKERS.contains(token) {
            (true, false, i + 1)
        } else if MINUTE_MARKERS.contains(token) {
            (true, true, i + 1)
        } else if matches!(*token, "baj" | "बज")
            && matches!(tokens.get(i + 1).copied(), Some("kar" | "कर"))
        {
            (true, true, i + 2)
        } else {
            (false, false, i + 1)
        };

        if !hour_marker {
            continue;
        }
        let Some((hour, mut minute)) = parse_hour_token(tokens[i - 1]) else {
            continue;
        };

        if minutes_follow {
            // the trailing "minute" word is optional
            if let Some(m) = tokens.get(next).and_then(|t| parse_minute_token(t)) {
                minute = m;
            }
        }
        return Some((hour, minute));
    }
    None
}

/// "6", "18", "630" (6:30 with the colon stripped) or a spoken hour word.
fn parse_hour_token(token: &str) -> Option<(u32, u32)> {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        let value: u32 = token.parse().ok()?;
        let (hour, minute) = match token.len() {
            1 | 2 => (value, 0),
            3 | 4 => (value / 100, value % 100),
            _ => return None,
        };
        return (hour <= 23 && minute < 60).then_some((hour, minute));
    }

    HOUR_WORDS
        .iter()
        .find(|(word, _, _)| *word == token)
        .map(|(_, hour, minute)| (*hour, *minute))
}

fn parse_minute_token(token: &str) -> Option<u32> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().ok().filter(|m| *m < 60);
    }
    match token {
        "das" | "दस" | "ten" => Some(10),
        "pandrah" | "पंद्रह" | "fifteen" => Some(15),
        "bees" | "बीस" | "twenty" => Some(20),
        "pachees" | "पच्चीस" => Some(25),
        "tees" | "तीस" | "thirty" => Some(30),
        "paintees" | "पैंतीस" => Some(35),
        "chaalees" | "chalis" | "चालीस" | "forty" => Some(40),
        "paintalees" | "पैंतालीस" => Some(45),
        "pachaas" | "pachas" | "पचास" | "fifty" => Some(50),
        _ => None,
    }
}
