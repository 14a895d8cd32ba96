//! Background runtime for the event store and timekeeper.
//!
//! Owns the store actor, the timekeeper poll job and the fire worker,
//! providing unified startup and graceful shutdown.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::VaaniConfig;
use crate::error::{VaaniError, VaaniResult};
use crate::events::{
    spawn_fire_worker, EventStore, FireHandler, FiredEventReceiver, JsonEventStore, StoreHandle,
    Timekeeper,
};

/// Background runtime managing the store actor and timekeeper lifecycle.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use vaani_core::{BackgroundRuntime, LoggingFireHandler, VaaniConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut runtime = BackgroundRuntime::new(VaaniConfig::default()).await?;
///     runtime.spawn_fire_handler(Arc::new(LoggingFireHandler))?;
///     runtime.start().await?;
///
///     // ... resolve and dispatch utterances ...
///
///     runtime.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct BackgroundRuntime {
    store: StoreHandle,
    store_task: Option<JoinHandle<()>>,
    /// Timekeeper (optional based on config).
    timekeeper: Option<Timekeeper>,
    /// Channel receiver for fired events (taken on first access).
    fired_events_rx: Option<FiredEventReceiver>,
    fire_worker: Option<JoinHandle<()>>,
    cancel: CancellationToken,
    config: VaaniConfig,
}

impl BackgroundRuntime {
    /// Create a runtime over the JSON store at `config.store_path`.
    ///
    /// This spawns the store actor but does not start polling.
    /// Call `start()` to begin background operations.
    pub async fn new(config: VaaniConfig) -> VaaniResult<Self> {
        let store = Arc::new(JsonEventStore::new(&config.store_path));
        Self::with_store(config, store).await
    }

    /// Create a runtime over any [`EventStore`].
    pub async fn with_store(config: VaaniConfig, store: Arc<dyn EventStore>) -> VaaniResult<Self> {
        config.validate()?;
        debug!(
            store_path = %config.store_path.display(),
            timekeeper_enabled = config.enable_timekeeper,
            poll_interval_secs = config.poll_interval_secs,
            "Creating BackgroundRuntime"
        );

        let cancel = CancellationToken::new();
        let (store, store_task) = StoreHandle::spawn(store, cancel.clone());

        let (timekeeper, fired_events_rx) = if config.enable_timekeeper {
            let (timekeeper, rx) = Timekeeper::new(store.clone(), config.poll_interval()).await?;
            (Some(timekeeper), Some(rx))
        } else {
            (None, None)
        };

        Ok(Self {
            store,
            store_task: Some(store_task),
            timekeeper,
            fired_events_rx,
            fire_worker: None,
            cancel,
            config,
        })
    }

    /// Start polling (no-op when the timekeeper is disabled).
    pub async fn start(&self) -> VaaniResult<()> {
        if let Some(ref timekeeper) = self.timekeeper {
            timekeeper.start().await?;
        }
        info!("Background runtime started");
        Ok(())
    }

    /// Route fired events to `handler` on a dedicated worker task.
    ///
    /// Consumes the fired-event receiver; fails if it was already taken or
    /// the timekeeper is disabled.
    pub fn spawn_fire_handler(&mut self, handler: Arc<dyn FireHandler>) -> VaaniResult<()> {
        let rx = self
            .fired_events_rx
            .take()
            .ok_or_else(|| VaaniError::config("fired event receiver unavailable"))?;
        self.fire_worker = Some(spawn_fire_worker(handler, rx, self.cancel.clone()));
        Ok(())
    }

    /// Take the fired events receiver.
    ///
    /// Can only be called once; subsequent calls return None.
    pub fn take_fired_events_rx(&mut self) -> Option<FiredEventReceiver> {
        self.fired_events_rx.take()
    }

    /// Stop polling, then stop the store actor and fire worker.
    pub async fn shutdown(&mut self) -> VaaniResult<()> {
        debug!("Shutting down background runtime");

        if let Some(ref mut timekeeper) = self.timekeeper {
            timekeeper.shutdown().await?;
        }

        self.cancel.cancel();
        for task in [self.fire_worker.take(), self.store_task.take()].into_iter().flatten() {
            if let Err(e) = task.await {
                warn!(error = %e, "Background task ended abnormally");
            }
        }

        info!("Background runtime stopped");
        Ok(())
    }

    /// Handle to the store actor.
    pub fn store(&self) -> StoreHandle {
        self.store.clone()
    }

    pub fn timekeeper(&self) -> Option<&Timekeeper> {
        self.timekeeper.as_ref()
    }

    pub fn config(&self) -> &VaaniConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, ScheduledEvent};
    use chrono::{Duration, Local};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> VaaniConfig {
        VaaniConfig::builder()
            .store_path(dir.path().join("events.json"))
            .poll_interval_secs(1)
            .build()
    }

    #[tokio::test]
    async fn test_runtime_creation_default() {
        let dir = TempDir::new().unwrap();
        let runtime = BackgroundRuntime::new(config(&dir)).await.unwrap();
        assert!(runtime.timekeeper().is_some());
        assert!(runtime.fired_events_rx.is_some());
    }

    #[tokio::test]
    async fn test_runtime_without_timekeeper() {
        let dir = TempDir::new().unwrap();
        let cfg = VaaniConfig {
            enable_timekeeper: false,
            ..config(&dir)
        };
        let mut runtime = BackgroundRuntime::new(cfg).await.unwrap();
        assert!(runtime.timekeeper().is_none());
        assert!(runtime.take_fired_events_rx().is_none());

        // store still works
        runtime.start().await.unwrap();
        assert!(runtime.store().load().await.unwrap().is_empty());
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_runtime_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let cfg = VaaniConfig {
            confidence_threshold: 150.0,
            ..config(&dir)
        };
        assert!(BackgroundRuntime::new(cfg).await.is_err());
    }

    #[tokio::test]
    async fn test_runtime_take_fired_events_rx() {
        let dir = TempDir::new().unwrap();
        let mut runtime = BackgroundRuntime::new(config(&dir)).await.unwrap();
        assert!(runtime.take_fired_events_rx().is_some());
        assert!(runtime.take_fired_events_rx().is_none());
        assert!(runtime
            .spawn_fire_handler(Arc::new(crate::dispatch::LoggingFireHandler))
            .is_err());
    }

    #[tokio::test]
    async fn test_runtime_start_and_shutdown() {
        let dir = TempDir::new().unwrap();
        let mut runtime = BackgroundRuntime::new(config(&dir)).await.unwrap();
        runtime
            .spawn_fire_handler(Arc::new(crate::dispatch::LoggingFireHandler))
            .unwrap();

        runtime.start().await.unwrap();
        assert!(runtime.timekeeper().unwrap().is_running().await);

        runtime.shutdown().await.unwrap();
        assert!(!runtime.timekeeper().unwrap().is_running().await);
        assert!(runtime.store().load().await.is_err());
    }

    #[tokio::test]
    async fn test_poll_through_runtime() {
        let dir = TempDir::new().unwrap();
        let mut runtime = BackgroundRuntime::new(config(&dir)).await.unwrap();
        let mut rx = runtime.take_fired_events_rx().unwrap();

        let now = Local::now().naive_local();
        let event = ScheduledEvent::new(EventKind::Alarm, now - Duration::seconds(5), "utho", now);
        runtime.store().append(event.clone()).await.unwrap();

        let fired = runtime.timekeeper().unwrap().poll_once(now).await.unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(rx.recv().await.unwrap().event.id, event.id);
    }
}
