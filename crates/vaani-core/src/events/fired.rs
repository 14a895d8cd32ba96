//! Delivery of fired events to the outside world.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::VaaniResult;
use crate::events::types::FiredEvent;

/// Channel for receiving fired events from the timekeeper.
pub type FiredEventReceiver = mpsc::Receiver<FiredEvent>;

/// Callback invoked once per fired event (speak the message, ring, ...).
#[async_trait]
pub trait FireHandler: Send + Sync {
    async fn fire(&self, fired: &FiredEvent) -> VaaniResult<()>;
}

/// Drain `rx` into `handler` until cancelled or the channel closes.
///
/// Handler errors are logged; the event is already marked done and is not
/// retried.
pub fn spawn_fire_worker(
    handler: Arc<dyn FireHandler>,
    mut rx: FiredEventReceiver,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let fired = tokio::select! {
                _ = cancel.cancelled() => break,
                fired = rx.recv() => match fired {
                    Some(fired) => fired,
                    None => break,
                },
            };

            let event_id = fired.event.id;
            match handler.fire(&fired).await {
                Ok(()) => info!(
                    event_id = %event_id,
                    kind = %fired.event.kind,
                    late_secs = fired.lateness_secs(),
                    "Event fired"
                ),
                Err(e) => error!(event_id = %event_id, error = %e, "Fire handler failed"),
            }
        }
    })
}
