//! Background poller that fires due events exactly once.
//!
//! Uses a tokio-cron-scheduler repeated job. Each cycle: load, pick pending
//! events with `trigger_time <= now`, flip them to done in one write, then
//! forward the flipped events to the fire channel. Flip-then-fire means a
//! crash between the two loses a fire rather than repeating it.

use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, warn};

use crate::error::{VaaniError, VaaniResult};
use crate::events::actor::StoreHandle;
use crate::events::fired::FiredEventReceiver;
use crate::events::types::{FiredEvent, ScheduledEvent};

/// Default seconds between polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

const FIRE_BUFFER: usize = 100;

/// Periodic due-event scanner.
pub struct Timekeeper {
    scheduler: JobScheduler,
    store: StoreHandle,
    fire_sender: mpsc::Sender<FiredEvent>,
    poll_interval: Duration,
    running: RwLock<bool>,
}

impl Timekeeper {
    /// Create a timekeeper over `store`.
    ///
    /// Returns the timekeeper and a receiver for fired events.
    pub async fn new(
        store: StoreHandle,
        poll_interval: Duration,
    ) -> VaaniResult<(Self, FiredEventReceiver)> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| VaaniError::internal(format!("Failed to create scheduler: {}", e)))?;

        let (tx, rx) = mpsc::channel(FIRE_BUFFER);

        Ok((
            Self {
                scheduler,
                store,
                fire_sender: tx,
                poll_interval: poll_interval.max(Duration::from_secs(1)),
                running: RwLock::new(false),
            },
            rx,
        ))
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Register the poll job and start the scheduler.
    pub async fn start(&self) -> VaaniResult<()> {
        let mut running = self.running.write().await;
        if *running {
            return Ok(());
        }

        let store = self.store.clone();
        let sender = self.fire_sender.clone();
        let job = Job::new_repeated_async(self.poll_interval, move |_uuid, _lock| {
            let store = store.clone();
            let sender = sender.clone();
            Box::pin(async move {
                let now = Local::now().naive_local();
                match poll_cycle(&store, &sender, now).await {
                    Ok(fired) if !fired.is_empty() => {
                        info!(count = fired.len(), "Timekeeper fired events");
                    }
                    Ok(_) => {}
                    Err(e) => error!(error = %e, "Timekeeper cycle failed"),
                }
            })
        })
        .map_err(|e| VaaniError::internal(format!("Failed to create poll job: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| VaaniError::internal(format!("Failed to add poll job: {}", e)))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| VaaniError::internal(format!("Failed to start scheduler: {}", e)))?;

        *running = true;
        info!(interval_secs = self.poll_interval.as_secs(), "Timekeeper started");
        Ok(())
    }

    /// Stop polling.
    pub async fn shutdown(&mut self) -> VaaniResult<()> {
        let mut running = self.running.write().await;
        if *running {
            self.scheduler
                .shutdown()
                .await
                .map_err(|e| VaaniError::internal(format!("Failed to shutdown scheduler: {}", e)))?;
            *running = false;
            info!("Timekeeper stopped");
        }
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Run one cycle against `now`. Returns the events fired by this cycle.
    pub async fn poll_once(&self, now: NaiveDateTime) -> VaaniResult<Vec<ScheduledEvent>> {
        poll_cycle(&self.store, &self.fire_sender, now).await
    }
}

async fn poll_cycle(
    store: &StoreHandle,
    sender: &mpsc::Sender<FiredEvent>,
    now: NaiveDateTime,
) -> VaaniResult<Vec<ScheduledEvent>> {
    let due: Vec<_> = store
        .load()
        .await?
        .into_iter()
        .filter(|event| event.is_due(now))
        .map(|event| event.id)
        .collect();

    if due.is_empty() {
        return Ok(Vec::new());
    }

    debug!(count = due.len(), %now, "Due events found");
    let flipped = store.mark_done(due).await?;

    // Never block the poll job on the fire consumer.
    for event in &flipped {
        match sender.try_send(FiredEvent::new(event.clone(), now)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(event_id = %event.id, "Fire channel full, event marked done without firing");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(event_id = %event.id, "Fire channel closed, event marked done without firing");
            }
        }
    }

    Ok(flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::store::{EventStore, JsonEventStore};
    use crate::events::types::{EventKind, EventStatus};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn setup(dir: &TempDir) -> (Arc<JsonEventStore>, StoreHandle) {
        let store = Arc::new(JsonEventStore::new(dir.path().join("events.json")));
        let (handle, _task) = StoreHandle::spawn(store.clone(), CancellationToken::new());
        (store, handle)
    }

    #[tokio::test]
    async fn test_timekeeper_creation() {
        let dir = TempDir::new().unwrap();
        let (_, handle) = setup(&dir);
        let (timekeeper, _rx) = Timekeeper::new(handle, Duration::from_secs(10)).await.unwrap();
        assert!(!timekeeper.is_running().await);
        assert_eq!(timekeeper.poll_interval(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_start_stop() {
        let dir = TempDir::new().unwrap();
        let (_, handle) = setup(&dir);
        let (mut timekeeper, _rx) = Timekeeper::new(handle, Duration::from_secs(10)).await.unwrap();

        timekeeper.start().await.unwrap();
        assert!(timekeeper.is_running().await);

        timekeeper.shutdown().await.unwrap();
        assert!(!timekeeper.is_running().await);
    }

    #[tokio::test]
    async fn test_due_event_fires_exactly_once() {
        let dir = TempDir::new().unwrap();
        let (store, handle) = setup(&dir);
        let due = ScheduledEvent::new(EventKind::Alarm, at(7, 0), "utho", at(6, 0));
        let future = ScheduledEvent::new(EventKind::Reminder, at(9, 0), "meeting", at(6, 0));
        handle.append(due.clone()).await.unwrap();
        handle.append(future.clone()).await.unwrap();

        let (timekeeper, mut rx) = Timekeeper::new(handle, Duration::from_secs(10)).await.unwrap();

        let fired = timekeeper.poll_once(at(7, 0)).await.unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, due.id);

        let received = rx.try_recv().unwrap();
        assert_eq!(received.event.id, due.id);
        assert_eq!(received.fired_at, at(7, 0));

        // second cycle finds nothing new
        assert!(timekeeper.poll_once(at(7, 0)).await.unwrap().is_empty());
        assert!(rx.try_recv().is_err());

        let stored = store.load().unwrap();
        assert_eq!(stored[0].status, EventStatus::Done);
        assert_eq!(stored[1].status, EventStatus::Pending);
    }

    #[tokio::test]
    async fn test_missed_events_fire_late() {
        let dir = TempDir::new().unwrap();
        let (_, handle) = setup(&dir);
        for h in [5, 6, 7] {
            handle
                .append(ScheduledEvent::new(EventKind::Alarm, at(h, 0), "x", at(4, 0)))
                .await
                .unwrap();
        }

        let (timekeeper, mut rx) = Timekeeper::new(handle, Duration::from_secs(10)).await.unwrap();
        let fired = timekeeper.poll_once(at(12, 0)).await.unwrap();
        assert_eq!(fired.len(), 3);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.lateness_secs(), 7 * 3600);
    }

    #[tokio::test]
    async fn test_unread_fire_channel_does_not_stall_polling() {
        let dir = TempDir::new().unwrap();
        let (store, handle) = setup(&dir);
        for i in 0..FIRE_BUFFER + 5 {
            store
                .append(&ScheduledEvent::new(EventKind::Alarm, at(7, 0), format!("alarm {i}"), at(6, 0)))
                .unwrap();
        }

        let (timekeeper, mut rx) = Timekeeper::new(handle, Duration::from_secs(10)).await.unwrap();
        let fired = tokio::time::timeout(Duration::from_secs(5), timekeeper.poll_once(at(8, 0)))
            .await
            .expect("poll blocked on a full fire channel")
            .unwrap();
        assert_eq!(fired.len(), FIRE_BUFFER + 5);

        let mut delivered = 0;
        while rx.try_recv().is_ok() {
            delivered += 1;
        }
        assert_eq!(delivered, FIRE_BUFFER);
    }

    #[tokio::test]
    async fn test_empty_store_is_quiet() {
        let dir = TempDir::new().unwrap();
        let (_, handle) = setup(&dir);
        let (timekeeper, mut rx) = Timekeeper::new(handle, Duration::from_secs(10)).await.unwrap();
        assert!(timekeeper.poll_once(at(12, 0)).await.unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_corrupt_store_means_nothing_due() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("events.json"), "garbage").unwrap();
        let (_, handle) = setup(&dir);
        let (timekeeper, _rx) = Timekeeper::new(handle, Duration::from_secs(10)).await.unwrap();
        assert!(timekeeper.poll_once(at(12, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interval_has_a_floor() {
        let dir = TempDir::new().unwrap();
        let (_, handle) = setup(&dir);
        let (timekeeper, _rx) = Timekeeper::new(handle, Duration::ZERO).await.unwrap();
        assert_eq!(timekeeper.poll_interval(), Duration::from_secs(1));
    }
}
