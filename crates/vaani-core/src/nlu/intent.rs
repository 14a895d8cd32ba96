//! The closed set of commands the assistant can act on.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Symbolic command category.
///
/// Tags serialize in SCREAMING_SNAKE_CASE (`LIGHT_ON`, `ALARM_SET`, ...) in
/// both serde and strum so taxonomy files and logs use the same spelling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    // Home automation
    LightOn,
    LightOff,
    FanOn,
    FanOff,
    AcOn,
    AcOff,

    // Time and date
    TimeAsk,
    DateAsk,
    DayAsk,

    // Weather and temperature
    WeatherAsk,
    TempAsk,
    RainAsk,

    // Alarms and reminders
    AlarmSet,
    ReminderSet,
    AlarmStop,

    // Translation
    TranslateAsk,

    // Volume
    VolumeUp,
    VolumeDown,

    /// No exemplar cleared the confidence floor.
    UnknownCommand,
}

impl Intent {
    /// Every intent that may appear in a taxonomy, in declaration order.
    pub fn classifiable() -> impl Iterator<Item = Intent> {
        Self::iter().filter(|i| *i != Intent::UnknownCommand)
    }

    /// Whether this intent schedules a deferred action.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Intent::AlarmSet | Intent::ReminderSet)
    }

    /// Whether this intent switches an appliance.
    pub fn is_appliance(&self) -> bool {
        matches!(
            self,
            Intent::LightOn
                | Intent::LightOff
                | Intent::FanOn
                | Intent::FanOff
                | Intent::AcOn
                | Intent::AcOff
        )
    }

    /// Static tag, e.g. `"ALARM_SET"`.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tag_spelling() {
        assert_eq!(Intent::LightOn.to_string(), "LIGHT_ON");
        assert_eq!(Intent::UnknownCommand.as_str(), "UNKNOWN_COMMAND");
        assert_eq!(Intent::from_str("REMINDER_SET").unwrap(), Intent::ReminderSet);
        assert!(Intent::from_str("DANCE").is_err());
    }

    #[test]
    fn test_serde_matches_strum() {
        let json = serde_json::to_string(&Intent::AcOn).unwrap();
        assert_eq!(json, "\"AC_ON\"");
        let back: Intent = serde_json::from_str("\"TEMP_ASK\"").unwrap();
        assert_eq!(back, Intent::TempAsk);
    }

    #[test]
    fn test_classifiable_excludes_unknown() {
        assert!(Intent::classifiable().all(|i| i != Intent::UnknownCommand));
        assert_eq!(Intent::classifiable().count(), Intent::iter().count() - 1);
    }

    #[test]
    fn test_flags() {
        assert!(Intent::AlarmSet.is_deferred());
        assert!(Intent::ReminderSet.is_deferred());
        assert!(!Intent::AlarmStop.is_deferred());
        assert!(Intent::FanOff.is_appliance());
        assert!(!Intent::TempAsk.is_appliance());
    }
}
