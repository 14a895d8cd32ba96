//! Intent → handler table.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::dispatch::devices::{Device, Devices, PowerState};
use crate::dispatch::handlers::{
    ApplianceHandler, DateHandler, DayHandler, HandlerContext, IntentHandler, ScheduleHandler,
    StaticReply, TemperatureHandler, TimeHandler, VolumeHandler, ALARM_STOP_REPLY, FAILURE_REPLY,
    RAIN_REPLY, TRANSLATE_REPLY, UNKNOWN_REPLY,
};
use crate::events::StoreHandle;
use crate::nlu::{Intent, IntentMatch};

/// Reply produced for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReply {
    pub segment: String,
    pub intent: Intent,
    pub reply: String,
    /// False when the handler failed and the generic failure reply was used.
    pub succeeded: bool,
}

/// Result of dispatching a whole utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub replies: Vec<SegmentReply>,
    /// Text to speak: segment replies joined by spaces. When the utterance
    /// had more than one segment, unknown-command replies are left out.
    pub spoken: String,
}

impl DispatchOutcome {
    pub fn is_silent(&self) -> bool {
        self.spoken.trim().is_empty()
    }
}

/// Routes each [`IntentMatch`] to the handler registered for its intent.
pub struct Dispatcher {
    handlers: HashMap<Intent, Arc<dyn IntentHandler>>,
    fallback: Arc<dyn IntentHandler>,
}

impl Dispatcher {
    /// Empty table; every intent gets the unknown-command reply.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Arc::new(StaticReply(UNKNOWN_REPLY)),
        }
    }

    /// Full table for every classifiable intent.
    pub fn standard(devices: Devices, store: StoreHandle) -> Self {
        let appliances = devices.appliances.clone();
        let switch = |device, state| -> Arc<dyn IntentHandler> {
            Arc::new(ApplianceHandler::new(appliances.clone(), device, state))
        };

        Self::new()
            .with_handler(Intent::LightOn, switch(Device::Light, PowerState::On))
            .with_handler(Intent::LightOff, switch(Device::Light, PowerState::Off))
            .with_handler(Intent::FanOn, switch(Device::Fan, PowerState::On))
            .with_handler(Intent::FanOff, switch(Device::Fan, PowerState::Off))
            .with_handler(Intent::AcOn, switch(Device::Ac, PowerState::On))
            .with_handler(Intent::AcOff, switch(Device::Ac, PowerState::Off))
            .with_handler(Intent::TimeAsk, Arc::new(TimeHandler))
            .with_handler(Intent::DateAsk, Arc::new(DateHandler))
            .with_handler(Intent::DayAsk, Arc::new(DayHandler))
            .with_handler(
                Intent::WeatherAsk,
                Arc::new(TemperatureHandler::weather(devices.clone())),
            )
            .with_handler(
                Intent::TempAsk,
                Arc::new(TemperatureHandler::room(devices.clone())),
            )
            .with_handler(Intent::RainAsk, Arc::new(StaticReply(RAIN_REPLY)))
            .with_handler(Intent::AlarmSet, Arc::new(ScheduleHandler::alarm(store.clone())))
            .with_handler(Intent::ReminderSet, Arc::new(ScheduleHandler::reminder(store)))
            .with_handler(Intent::AlarmStop, Arc::new(StaticReply(ALARM_STOP_REPLY)))
            .with_handler(Intent::TranslateAsk, Arc::new(StaticReply(TRANSLATE_REPLY)))
            .with_handler(Intent::VolumeUp, Arc::new(VolumeHandler::up(devices.volume.clone())))
            .with_handler(Intent::VolumeDown, Arc::new(VolumeHandler::down(devices.volume)))
    }

    /// Builder method to register a handler, replacing any previous one.
    pub fn with_handler(mut self, intent: Intent, handler: Arc<dyn IntentHandler>) -> Self {
        self.register(intent, handler);
        self
    }

    pub fn register(&mut self, intent: Intent, handler: Arc<dyn IntentHandler>) {
        self.handlers.insert(intent, handler);
    }

    pub fn handles(&self, intent: Intent) -> bool {
        self.handlers.contains_key(&intent)
    }

    /// Dispatch against the current local time.
    pub async fn dispatch(&self, matches: &[IntentMatch]) -> DispatchOutcome {
        self.dispatch_at(matches, Local::now().naive_local()).await
    }

    /// Dispatch every match in order. A failing handler only affects its own
    /// segment.
    pub async fn dispatch_at(&self, matches: &[IntentMatch], now: NaiveDateTime) -> DispatchOutcome {
        let mut replies = Vec::with_capacity(matches.len());

        for m in matches {
            let handler = self.handlers.get(&m.intent).unwrap_or(&self.fallback);
            let ctx = HandlerContext {
                segment: &m.segment,
                now,
            };

            let (reply, succeeded) = match handler.handle(&ctx).await {
                Ok(reply) => (reply, true),
                Err(e) => {
                    error!(
                        intent = %m.intent,
                        segment = %m.segment,
                        error = %e,
                        code = e.code().as_str(),
                        "Handler failed"
                    );
                    (FAILURE_REPLY.to_string(), false)
                }
            };
            debug!(intent = %m.intent, succeeded, "Segment dispatched");

            replies.push(SegmentReply {
                segment: m.segment.clone(),
                intent: m.intent,
                reply,
                succeeded,
            });
        }

        let multi = replies.len() > 1;
        let spoken = replies
            .iter()
            .filter(|r| !(multi && r.intent == Intent::UnknownCommand))
            .map(|r| r.reply.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        DispatchOutcome { replies, spoken }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::devices::MockApplianceController;
    use crate::error::VaaniError;
    use crate::events::JsonEventStore;
    use crate::nlu::CommandResolver;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn standard(dir: &TempDir, devices: Devices) -> (Dispatcher, StoreHandle) {
        let store = Arc::new(JsonEventStore::new(dir.path().join("events.json")));
        let (handle, _task) = StoreHandle::spawn(store, CancellationToken::new());
        (Dispatcher::standard(devices, handle.clone()), handle)
    }

    #[tokio::test]
    async fn test_every_intent_has_a_handler() {
        let dir = TempDir::new().unwrap();
        let (dispatcher, _) = standard(&dir, Devices::simulated());
        for intent in Intent::classifiable() {
            assert!(dispatcher.handles(intent), "{intent} has no handler");
        }
        assert!(!dispatcher.handles(Intent::UnknownCommand));
    }

    #[tokio::test]
    async fn test_compound_command_reply() {
        let dir = TempDir::new().unwrap();
        let (dispatcher, _) = standard(&dir, Devices::simulated());
        let matches = CommandResolver::builtin().resolve("batti on karo aur panka chalao");

        let outcome = dispatcher.dispatch_at(&matches, now()).await;
        assert_eq!(outcome.replies.len(), 2);
        assert_eq!(
            outcome.spoken,
            "ठीक है, बत्ती चालू कर दी गई है। ठीक है, पंखा चालू कर दिया गया है।"
        );
    }

    #[tokio::test]
    async fn test_unknown_dropped_from_multi_segment_reply() {
        let dir = TempDir::new().unwrap();
        let (dispatcher, _) = standard(&dir, Devices::simulated());
        let matches =
            CommandResolver::builtin().resolve("pankha chalao aur what is the capital of france");

        let outcome = dispatcher.dispatch_at(&matches, now()).await;
        assert_eq!(outcome.replies.len(), 2);
        assert_eq!(outcome.replies[1].reply, UNKNOWN_REPLY);
        assert_eq!(outcome.spoken, "ठीक है, पंखा चालू कर दिया गया है।");
    }

    #[tokio::test]
    async fn test_single_unknown_is_spoken() {
        let dir = TempDir::new().unwrap();
        let (dispatcher, _) = standard(&dir, Devices::simulated());
        let matches = CommandResolver::builtin().resolve("what is the capital of france");

        let outcome = dispatcher.dispatch_at(&matches, now()).await;
        assert_eq!(outcome.spoken, UNKNOWN_REPLY);
    }

    #[tokio::test]
    async fn test_empty_utterance_is_silent() {
        let dispatcher = Dispatcher::new();
        let outcome = dispatcher.dispatch_at(&[], now()).await;
        assert!(outcome.is_silent());
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_stop_others() {
        let mut appliances = MockApplianceController::new();
        appliances
            .expect_set_state()
            .returning(|device, _| match device {
                Device::Light => Err(VaaniError::device("relay stuck")),
                _ => Ok(()),
            });
        let devices = Devices {
            appliances: Arc::new(appliances),
            ..Devices::simulated()
        };

        let dir = TempDir::new().unwrap();
        let (dispatcher, _) = standard(&dir, devices);
        let matches = CommandResolver::builtin().resolve("batti on karo aur panka chalao");

        let outcome = dispatcher.dispatch_at(&matches, now()).await;
        assert!(!outcome.replies[0].succeeded);
        assert_eq!(outcome.replies[0].reply, FAILURE_REPLY);
        assert!(outcome.replies[1].succeeded);
    }

    #[tokio::test]
    async fn test_alarm_is_persisted() {
        let dir = TempDir::new().unwrap();
        let (dispatcher, store) = standard(&dir, Devices::simulated());
        let matches = CommandResolver::builtin().resolve("5 minute ka alarm lagao");
        assert_eq!(matches[0].intent, Intent::AlarmSet);

        let outcome = dispatcher.dispatch_at(&matches, now()).await;
        assert!(outcome.replies[0].succeeded);

        let events = store.load().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].trigger_time - now()).num_minutes(), 5);
    }

    #[tokio::test]
    async fn test_custom_handler_overrides() {
        let dispatcher =
            Dispatcher::new().with_handler(Intent::RainAsk, Arc::new(StaticReply("baarish hogi")));
        let matches = CommandResolver::builtin().resolve("kya aaj baarish hogi");
        assert_eq!(matches[0].intent, Intent::RainAsk);

        let outcome = dispatcher.dispatch_at(&matches, now()).await;
        assert_eq!(outcome.spoken, "baarish hogi");
    }
}
