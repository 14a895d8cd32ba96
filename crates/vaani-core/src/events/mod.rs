//! Durable alarms and reminders.
//!
//! This module provides:
//! - `ScheduledEvent` and its persisted JSON shape
//! - `EventStore` with an atomic-rename JSON file implementation
//! - `StoreHandle`, the single-writer actor in front of the store
//! - `Timekeeper`, the poller that fires due events exactly once
//! - `FireHandler` and the worker that delivers fired events

mod actor;
mod fired;
mod store;
mod timekeeper;
mod types;

pub use actor::StoreHandle;
pub use fired::{spawn_fire_worker, FireHandler, FiredEventReceiver};
pub use store::{EventStore, JsonEventStore};
pub use timekeeper::{Timekeeper, DEFAULT_POLL_INTERVAL_SECS};
pub use types::{
    local_timestamp, EventKind, EventStatus, FiredEvent, ScheduledEvent, TIMESTAMP_FORMAT,
};
