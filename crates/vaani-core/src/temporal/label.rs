//! Event labels for long-term reminders.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Short tag describing what a scheduled event is about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventLabel {
    Birthday,
    Meeting,
    Vaccination,
    Medicine,
    /// No keyword matched.
    #[default]
    Reminder,
}

// Checked in order; first label with a matching token wins.
const LABEL_KEYWORDS: &[(EventLabel, &[&str])] = &[
    (
        EventLabel::Birthday,
        &["बर्थडे", "जन्मदिन", "birthday", "janamdin", "janmdin"],
    ),
    (EventLabel::Meeting, &["मीटिंग", "बैठक", "meeting", "baithak"]),
    (
        EventLabel::Vaccination,
        &[
            "वैक्सीन",
            "वैक्सीनेशन",
            "टीका",
            "vaccine",
            "vaccination",
            "tika",
            "teeka",
        ],
    ),
    (
        EventLabel::Medicine,
        &["दवाई", "दवा", "dawai", "dawa", "dawaai", "medicine", "tablet"],
    ),
];

impl EventLabel {
    /// Label for normalized `text`, [`EventLabel::Reminder`] when nothing matches.
    pub fn detect(text: &str) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        LABEL_KEYWORDS
            .iter()
            .find(|(_, words)| tokens.iter().any(|t| words.contains(t)))
            .map(|(label, _)| *label)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Hindi name used in spoken replies.
    pub fn spoken(&self) -> &'static str {
        match self {
            EventLabel::Birthday => "जन्मदिन",
            EventLabel::Meeting => "मीटिंग",
            EventLabel::Vaccination => "वैक्सीनेशन",
            EventLabel::Medicine => "दवाई",
            EventLabel::Reminder => "रिमाइंडर",
        }
    }
}
