//! Temporal expression extraction for alarms and reminders.
//!
//! Two modes:
//! - relative: a duration phrase ("5 minute", "आधा घंटा") added to now
//! - absolute: day offset + hour + minute, with day-part disambiguation
//!
//! All parsing is deterministic and takes the reference time as an argument.

mod clock;
mod duration;
mod extractor;
mod label;

pub use clock::{day_offset, read_clock, ClockReading, DayPart, DEFAULT_HOUR};
pub use duration::{extract_minutes, DURATION_TABLE};
pub use extractor::{TemporalExpression, TemporalExtractor, TemporalKind};
pub use label::EventLabel;
