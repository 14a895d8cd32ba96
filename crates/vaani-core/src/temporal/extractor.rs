//! Turns an alarm/reminder utterance into a concrete trigger time.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlu::normalize_text;
use crate::temporal::clock::{read_clock, DayPart};
use crate::temporal::duration::extract_minutes;
use crate::temporal::label::EventLabel;

/// How the trigger time was expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TemporalKind {
    /// "5 minute baad": offset from now.
    Relative { minutes: u32 },
    /// "kal subah 9 baje": day offset plus wall-clock time.
    Absolute {
        day_offset: u32,
        hour: u32,
        minute: u32,
        explicit_time: bool,
        day_part: Option<DayPart>,
    },
}

/// Result of temporal extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalExpression {
    pub kind: TemporalKind,
    /// Local wall-clock trigger, strictly after the reference time.
    pub trigger_at: NaiveDateTime,
    pub label: EventLabel,
}

impl TemporalExpression {
    pub fn is_relative(&self) -> bool {
        matches!(self.kind, TemporalKind::Relative { .. })
    }

    /// Minutes from `now` until the trigger, rounded down.
    pub fn minutes_from(&self, now: NaiveDateTime) -> i64 {
        (self.trigger_at - now).num_minutes()
    }
}

/// Stateless temporal parser for Hindi/Hinglish time phrases.
///
/// An explicit clock time ("6 baje", "6 baj kar 30 minute") takes precedence
/// over a duration phrase so "30 minute" inside a clock reading is not taken
/// as an offset. Absolute times not strictly after `now` roll forward a day.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalExtractor;

impl TemporalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a trigger time from `text` relative to `now`.
    ///
    /// Always produces a result: an utterance with no recognizable time falls
    /// back to the day-part default (or 10:00) on the named day.
    pub fn extract(&self, text: &str, now: NaiveDateTime) -> TemporalExpression {
        let normalized = normalize_text(text);
        let label = EventLabel::detect(&normalized);
        let clock = read_clock(&normalized);

        if !clock.explicit_time {
            if let Some(minutes) = extract_minutes(&normalized) {
                let trigger_at = now + Duration::minutes(i64::from(minutes));
                debug!(text, minutes, %trigger_at, "Relative time extracted");
                return TemporalExpression {
                    kind: TemporalKind::Relative { minutes },
                    trigger_at,
                    label,
                };
            }
        }

        let trigger_at = absolute_trigger(now, clock.day_offset, clock.hour, clock.minute);
        debug!(
            text,
            day_offset = clock.day_offset,
            hour = clock.hour,
            minute = clock.minute,
            %trigger_at,
            "Absolute time extracted"
        );

        TemporalExpression {
            kind: TemporalKind::Absolute {
                day_offset: clock.day_offset,
                hour: clock.hour,
                minute: clock.minute,
                explicit_time: clock.explicit_time,
                day_part: clock.day_part,
            },
            trigger_at,
            label,
        }
    }

    /// Only the relative offset in minutes, if the text names one.
    pub fn relative_minutes(&self, text: &str) -> Option<u32> {
        extract_minutes(&normalize_text(text))
    }
}

fn absolute_trigger(now: NaiveDateTime, day_offset: u32, hour: u32, minute: u32) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    let date = now.date() + Duration::days(i64::from(day_offset));
    let candidate = date.and_time(time);

    if candidate <= now {
        candidate + Duration::days(1)
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_relative_alarm() {
        let now = at(2025, 3, 10, 14, 0);
        let expr = TemporalExtractor::new().extract("5 minute ka alarm lagao", now);
        assert_eq!(expr.kind, TemporalKind::Relative { minutes: 5 });
        assert_eq!(expr.trigger_at, at(2025, 3, 10, 14, 5));
        assert_eq!(expr.minutes_from(now), 5);
    }

    #[test]
    fn test_relative_devanagari() {
        let now = at(2025, 3, 10, 23, 50);
        let expr = TemporalExtractor::new().extract("आधे घंटे बाद याद दिलाना", now);
        assert_eq!(expr.kind, TemporalKind::Relative { minutes: 30 });
        assert_eq!(expr.trigger_at, at(2025, 3, 11, 0, 20));
    }

    #[test]
    fn test_tomorrow_morning_meeting() {
        let now = at(2025, 3, 10, 20, 0);
        let expr = TemporalExtractor::new().extract("kal subah meeting ka reminder", now);
        match expr.kind {
            TemporalKind::Absolute {
                day_offset,
                hour,
                minute,
                explicit_time,
                day_part,
            } => {
                assert_eq!(day_offset, 1);
                assert_eq!(hour, 9);
                assert_eq!(minute, 0);
                assert!(!explicit_time);
                assert_eq!(day_part, Some(DayPart::Morning));
            }
            other => panic!("expected absolute, got {other:?}"),
        }
        assert_eq!(expr.trigger_at, at(2025, 3, 11, 9, 0));
        assert_eq!(expr.label, EventLabel::Meeting);
    }

    #[test]
    fn test_clock_time_beats_duration() {
        let now = at(2025, 3, 10, 8, 0);
        let expr = TemporalExtractor::new().extract("shaam 6 baj kar 30 minute pe alarm", now);
        assert!(!expr.is_relative());
        assert_eq!(expr.trigger_at, at(2025, 3, 10, 18, 30));
    }

    #[test]
    fn test_past_time_rolls_forward() {
        let now = at(2025, 3, 10, 19, 0);
        let expr = TemporalExtractor::new().extract("shaam 6 baje dawai", now);
        assert_eq!(expr.trigger_at, at(2025, 3, 11, 18, 0));
        assert_eq!(expr.label, EventLabel::Medicine);

        // equal to now is not "after now"
        let now = at(2025, 3, 10, 18, 0);
        let expr = TemporalExtractor::new().extract("shaam 6 baje", now);
        assert_eq!(expr.trigger_at, at(2025, 3, 11, 18, 0));
    }

    #[test]
    fn test_trigger_always_after_now() {
        let extractor = TemporalExtractor::new();
        let phrases = [
            "alarm lagao",
            "aaj subah 6 baje",
            "raat 12 baje",
            "parso shaam",
            "10 minute",
            "sava 8 baje",
            "kal ka reminder",
        ];
        for hour in [0, 6, 12, 18, 23] {
            let now = at(2025, 12, 31, hour, 59);
            for phrase in phrases {
                let expr = extractor.extract(phrase, now);
                assert!(expr.trigger_at > now, "{phrase} at {now}");
            }
        }
    }

    #[test]
    fn test_no_time_defaults() {
        let now = at(2025, 3, 10, 8, 0);
        let expr = TemporalExtractor::new().extract("reminder set karo", now);
        assert_eq!(expr.trigger_at, at(2025, 3, 10, 10, 0));
        assert_eq!(expr.label, EventLabel::Reminder);
    }

    #[test]
    fn test_day_after_tomorrow_birthday() {
        let now = at(2025, 3, 10, 8, 0);
        let expr = TemporalExtractor::new().extract("परसों शाम को जन्मदिन है", now);
        assert_eq!(expr.trigger_at, at(2025, 3, 12, 18, 0));
        assert_eq!(expr.label, EventLabel::Birthday);
    }

    #[test]
    fn test_relative_minutes() {
        let extractor = TemporalExtractor::new();
        assert_eq!(extractor.relative_minutes("Das minute ka alarm!"), Some(10));
        assert_eq!(extractor.relative_minutes("kal subah"), None);
    }
}
