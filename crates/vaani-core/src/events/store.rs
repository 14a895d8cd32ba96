//! Event storage trait and the JSON-file implementation.
//!
//! The whole collection lives in one JSON array. Every mutation is a full
//! read-modify-write; the write goes to a temp file in the same directory
//! and is renamed over the original, so readers never see a torn file.

use chrono::NaiveDateTime;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ErrorCode, VaaniError, VaaniResult};
use crate::events::types::{EventStatus, ScheduledEvent};

/// Trait for event storage operations.
pub trait EventStore: Send + Sync {
    /// Snapshot of every stored event, in insertion order.
    fn load(&self) -> VaaniResult<Vec<ScheduledEvent>>;

    /// Append one event and persist.
    fn append(&self, event: &ScheduledEvent) -> VaaniResult<()>;

    /// Flip the listed events from pending to done and persist once.
    ///
    /// Returns only the events this call actually flipped; ids that are
    /// unknown or already done are skipped.
    fn mark_done(&self, ids: &[Uuid]) -> VaaniResult<Vec<ScheduledEvent>>;

    /// Pending events due at `now`, in insertion order.
    fn due(&self, now: NaiveDateTime) -> VaaniResult<Vec<ScheduledEvent>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|event| event.is_due(now))
            .collect())
    }
}

/// Event store backed by a single JSON file.
pub struct JsonEventStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonEventStore {
    /// Open a store at `path`. The file is created on the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn guard(&self) -> VaaniResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| VaaniError::internal("event store lock poisoned"))
    }

    /// Read the collection. Absent file → empty. Unparseable file → empty,
    /// and when `preserve_corrupt` is set the bad file is copied aside first
    /// so the next write does not destroy it. Records stored without an `id`
    /// get one, and the file is rewritten so later reads see the same ids.
    fn read_events(&self, preserve_corrupt: bool) -> VaaniResult<Vec<ScheduledEvent>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(VaaniError::store_with_source(
                    format!("reading {}", self.path.display()),
                    ErrorCode::StoreReadFailed,
                    e,
                ))
            }
        };

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        match parse_events(&data) {
            Ok((events, missing_ids)) => {
                if missing_ids {
                    // Ids must be stable between the poll's load and mark_done.
                    info!(path = %self.path.display(), "Assigning ids to stored events");
                    self.write_events(&events)?;
                }
                Ok(events)
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    code = ErrorCode::StoreCorrupted.as_str(),
                    "Event store unreadable, treating as empty"
                );
                if preserve_corrupt {
                    let backup = self.corrupt_backup_path();
                    if let Err(copy_err) = fs::copy(&self.path, &backup) {
                        warn!(backup = %backup.display(), error = %copy_err, "Failed to back up corrupt store");
                    }
                }
                Ok(Vec::new())
            }
        }
    }

    fn write_events(&self, events: &[ScheduledEvent]) -> VaaniResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| {
            VaaniError::store_with_source(
                format!("creating store directory {}", dir.display()),
                ErrorCode::StoreWriteFailed,
                e,
            )
        })?;

        let data = serde_json::to_vec_pretty(events)?;
        let write_err = |e: std::io::Error| {
            VaaniError::store_with_source(
                format!("writing {}", self.path.display()),
                ErrorCode::StoreWriteFailed,
                e,
            )
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(&data).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), count = events.len(), "Event store written");
        Ok(())
    }
}

/// Parse the stored array, reporting whether any record lacked an `id`.
fn parse_events(data: &str) -> serde_json::Result<(Vec<ScheduledEvent>, bool)> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(data)?;
    let missing_ids = raw.iter().any(|record| record.get("id").is_none());
    let events = raw
        .into_iter()
        .map(serde_json::from_value)
        .collect::<serde_json::Result<Vec<ScheduledEvent>>>()?;
    Ok((events, missing_ids))
}

impl EventStore for JsonEventStore {
    fn load(&self) -> VaaniResult<Vec<ScheduledEvent>> {
        let _guard = self.guard()?;
        self.read_events(false)
    }

    fn append(&self, event: &ScheduledEvent) -> VaaniResult<()> {
        let _guard = self.guard()?;
        let mut events = self.read_events(true)?;
        events.push(event.clone());
        self.write_events(&events)
    }

    fn mark_done(&self, ids: &[Uuid]) -> VaaniResult<Vec<ScheduledEvent>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let _guard = self.guard()?;
        let mut events = self.read_events(true)?;
        let mut flipped = Vec::new();

        for event in events.iter_mut() {
            if event.is_pending() && ids.contains(&event.id) {
                event.status = EventStatus::Done;
                flipped.push(event.clone());
            }
        }

        if !flipped.is_empty() {
            self.write_events(&events)?;
        }
        Ok(flipped)
    }
}
