//! Single-writer access to the event store.
//!
//! One task owns the [`EventStore`] and serves requests from a channel, so
//! the dispatcher's appends and the timekeeper's flips never interleave.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{VaaniError, VaaniResult};
use crate::events::store::EventStore;
use crate::events::types::ScheduledEvent;

const REQUEST_BUFFER: usize = 64;

enum StoreRequest {
    Append {
        event: ScheduledEvent,
        reply: oneshot::Sender<VaaniResult<()>>,
    },
    MarkDone {
        ids: Vec<Uuid>,
        reply: oneshot::Sender<VaaniResult<Vec<ScheduledEvent>>>,
    },
    Load {
        reply: oneshot::Sender<VaaniResult<Vec<ScheduledEvent>>>,
    },
}

/// Cloneable handle to the store actor.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreRequest>,
}

impl StoreHandle {
    /// Spawn the actor task. It stops when `cancel` fires or every handle is
    /// dropped.
    pub fn spawn(store: Arc<dyn EventStore>, cancel: CancellationToken) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
        let task = tokio::spawn(run(store, rx, cancel));
        (Self { tx }, task)
    }

    /// Append an event; resolves once it is on disk.
    pub async fn append(&self, event: ScheduledEvent) -> VaaniResult<()> {
        let (reply, rx) = oneshot::channel();
        self.request(StoreRequest::Append { event, reply }, rx).await
    }

    /// Flip pending events to done; returns the ones actually flipped.
    pub async fn mark_done(&self, ids: Vec<Uuid>) -> VaaniResult<Vec<ScheduledEvent>> {
        let (reply, rx) = oneshot::channel();
        self.request(StoreRequest::MarkDone { ids, reply }, rx).await
    }

    /// Snapshot of the stored events.
    pub async fn load(&self) -> VaaniResult<Vec<ScheduledEvent>> {
        let (reply, rx) = oneshot::channel();
        self.request(StoreRequest::Load { reply }, rx).await
    }

    async fn request<T>(
        &self,
        request: StoreRequest,
        rx: oneshot::Receiver<VaaniResult<T>>,
    ) -> VaaniResult<T> {
        self.tx
            .send(request)
            .await
            .map_err(|_| VaaniError::channel_closed("event store actor"))?;
        rx.await
            .map_err(|_| VaaniError::channel_closed("event store reply"))?
    }
}

async fn run(store: Arc<dyn EventStore>, mut rx: mpsc::Receiver<StoreRequest>, cancel: CancellationToken) {
    info!("Event store actor started");

    loop {
        let request = tokio::select! {
            _ = cancel.cancelled() => break,
            request = rx.recv() => match request {
                Some(request) => request,
                None => break,
            },
        };
        handle(&store, request).await;
    }

    info!("Event store actor stopped");
}

async fn handle(store: &Arc<dyn EventStore>, request: StoreRequest) {
    // File IO runs on the blocking pool; the actor awaits it, so requests
    // are still applied strictly one at a time.
    let store = Arc::clone(store);
    match request {
        StoreRequest::Append { event, reply } => {
            let id = event.id;
            let result = blocking(move || store.append(&event)).await;
            debug!(event_id = %id, ok = result.is_ok(), "Append handled");
            send_reply(reply, result);
        }
        StoreRequest::MarkDone { ids, reply } => {
            let result = blocking(move || store.mark_done(&ids)).await;
            send_reply(reply, result);
        }
        StoreRequest::Load { reply } => {
            let result = blocking(move || store.load()).await;
            send_reply(reply, result);
        }
    }
}

async fn blocking<T, F>(op: F) -> VaaniResult<T>
where
    F: FnOnce() -> VaaniResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| VaaniError::internal(format!("store task failed: {}", e)))?
}

fn send_reply<T>(reply: oneshot::Sender<VaaniResult<T>>, result: VaaniResult<T>) {
    if reply.send(result).is_err() {
        warn!("Store caller went away before the reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::store::JsonEventStore;
    use crate::events::types::{EventKind, EventStatus};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn event(message: &str) -> ScheduledEvent {
        let t = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        ScheduledEvent::new(EventKind::Alarm, t, message, t)
    }

    fn spawn(dir: &TempDir) -> (StoreHandle, CancellationToken, JoinHandle<()>) {
        let store = Arc::new(JsonEventStore::new(dir.path().join("events.json")));
        let cancel = CancellationToken::new();
        let (handle, task) = StoreHandle::spawn(store, cancel.clone());
        (handle, cancel, task)
    }

    #[tokio::test]
    async fn test_append_and_load() {
        let dir = TempDir::new().unwrap();
        let (handle, _cancel, _task) = spawn(&dir);

        handle.append(event("a")).await.unwrap();
        handle.append(event("b")).await.unwrap();

        let events = handle.load().await.unwrap();
        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let (handle, _cancel, _task) = spawn(&dir);

        let mut joins = Vec::new();
        for i in 0..16 {
            let handle = handle.clone();
            joins.push(tokio::spawn(async move {
                handle.append(event(&format!("e{i}"))).await
            }));
        }
        for join in joins {
            join.await.unwrap().unwrap();
        }

        assert_eq!(handle.load().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_mark_done_through_actor() {
        let dir = TempDir::new().unwrap();
        let (handle, _cancel, _task) = spawn(&dir);
        let e = event("x");
        handle.append(e.clone()).await.unwrap();

        let flipped = handle.mark_done(vec![e.id]).await.unwrap();
        assert_eq!(flipped.len(), 1);
        assert_eq!(flipped[0].status, EventStatus::Done);
        assert!(handle.mark_done(vec![e.id]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_stops_actor() {
        let dir = TempDir::new().unwrap();
        let (handle, cancel, task) = spawn(&dir);

        cancel.cancel();
        task.await.unwrap();

        let err = handle.load().await.unwrap_err();
        assert!(matches!(err, VaaniError::ChannelClosed(_)));
    }
}
