//! Scheduled event types.
//!
//! - `ScheduledEvent`: one persisted alarm or reminder
//! - `EventKind`: alarm vs reminder
//! - `EventStatus`: pending → done, never back

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::temporal::EventLabel;

/// On-disk timestamp layout (local wall-clock time, no zone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Alarm or reminder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Alarm,
    Reminder,
}

/// Lifecycle of a scheduled event.
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
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Done,
}

/// A persisted alarm or reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Stable reference; generated for records written without one.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// When the event becomes due (local time).
    #[serde(with = "local_timestamp")]
    pub trigger_time: NaiveDateTime,
    /// Text spoken when the event fires.
    pub message: String,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub label: EventLabel,
    #[serde(default, with = "local_timestamp")]
    pub created_at: NaiveDateTime,
}

impl ScheduledEvent {
    /// Create a pending event.
    pub fn new(
        kind: EventKind,
        trigger_time: NaiveDateTime,
        message: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            trigger_time,
            message: message.into(),
            status: EventStatus::Pending,
            label: EventLabel::default(),
            created_at,
        }
    }

    /// Builder method to set the label.
    pub fn with_label(mut self, label: EventLabel) -> Self {
        self.label = label;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == EventStatus::Pending
    }

    /// Pending and not in the future.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.is_pending() && self.trigger_time <= now
    }
}

/// An event handed to the fire callback after it was marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredEvent {
    pub event: ScheduledEvent,
    #[serde(with = "local_timestamp")]
    pub fired_at: NaiveDateTime,
}

impl FiredEvent {
    pub fn new(event: ScheduledEvent, fired_at: NaiveDateTime) -> Self {
        Self { event, fired_at }
    }

    /// Seconds between the due time and the actual fire.
    pub fn lateness_secs(&self) -> i64 {
        (self.fired_at - self.event.trigger_time).num_seconds().max(0)
    }
}

/// Serde adapter for [`TIMESTAMP_FORMAT`].
pub mod local_timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_new_event_is_pending() {
        let event = ScheduledEvent::new(EventKind::Alarm, at(7, 0), "uthne ka samay", at(6, 0));
        assert!(event.is_pending());
        assert_eq!(event.label, EventLabel::Reminder);
        assert!(!event.is_due(at(6, 59)));
        assert!(event.is_due(at(7, 0)));
    }

    #[test]
    fn test_done_event_is_never_due() {
        let mut event = ScheduledEvent::new(EventKind::Reminder, at(7, 0), "dawai", at(6, 0));
        event.status = EventStatus::Done;
        assert!(!event.is_due(at(8, 0)));
    }

    #[test]
    fn test_persisted_shape() {
        let event = ScheduledEvent::new(EventKind::Reminder, at(9, 0), "meeting", at(8, 30))
            .with_label(EventLabel::Meeting);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "reminder");
        assert_eq!(json["trigger_time"], "2025-03-10 09:00:00");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["label"], "meeting");
        assert_eq!(json["created_at"], "2025-03-10 08:30:00");
        assert_eq!(json["id"], event.id.to_string());
    }

    #[test]
    fn test_reads_record_without_supplements() {
        let raw = r#"{
            "type": "alarm",
            "trigger_time": "2025-03-10 07:00:00",
            "message": "alarm",
            "status": "done"
        }"#;
        let event: ScheduledEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.kind, EventKind::Alarm);
        assert_eq!(event.status, EventStatus::Done);
        assert_eq!(event.label, EventLabel::Reminder);
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let raw = r#"{"type":"alarm","trigger_time":"tomorrow","message":"x","status":"pending"}"#;
        assert!(serde_json::from_str::<ScheduledEvent>(raw).is_err());
    }

    #[test]
    fn test_lateness() {
        let event = ScheduledEvent::new(EventKind::Alarm, at(7, 0), "x", at(6, 0));
        assert_eq!(FiredEvent::new(event.clone(), at(7, 1)).lateness_secs(), 60);
        assert_eq!(FiredEvent::new(event, at(6, 59)).lateness_secs(), 0);
    }
}
