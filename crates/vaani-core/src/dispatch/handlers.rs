//! Per-intent handlers producing spoken Hindi replies.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::sync::Arc;
use tracing::info;

use crate::dispatch::devices::{ApplianceController, Device, Devices, PowerState, VolumeControl};
use crate::error::VaaniResult;
use crate::events::{EventKind, ScheduledEvent, StoreHandle};
use crate::temporal::{TemporalExpression, TemporalExtractor, TemporalKind};

pub const UNKNOWN_REPLY: &str = "माफ़ कीजिए, मैं केवल घर के उपकरणों को नियंत्रित कर सकती हूँ।";
pub const FAILURE_REPLY: &str = "माफ़ कीजिए, अभी यह काम नहीं हो पाया।";
pub const RAIN_REPLY: &str = "आज बारिश की कोई संभावना नहीं है।";
pub const ALARM_STOP_REPLY: &str = "अलार्म बंद कर दिया गया है।";
pub const TRANSLATE_REPLY: &str = "माफ़ कीजिए, अनुवाद की सुविधा अभी उपलब्ध नहीं है।";

/// Percent step for one volume command.
pub const VOLUME_STEP_PERCENT: i32 = 15;

const HINDI_WEEKDAYS: [&str; 7] = [
    "सोमवार",
    "मंगलवार",
    "बुधवार",
    "बृहस्पतिवार",
    "शुक्रवार",
    "शनिवार",
    "रविवार",
];

/// What a handler gets to see about the segment being acted on.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Normalized segment text.
    pub segment: &'a str,
    /// Local wall-clock time of the dispatch.
    pub now: NaiveDateTime,
}

/// Acts on one resolved intent.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> VaaniResult<String>;
}

/// Fixed reply, no side effects.
#[derive(Debug, Clone, Copy)]
pub struct StaticReply(pub &'static str);

#[async_trait]
impl IntentHandler for StaticReply {
    async fn handle(&self, _ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        Ok(self.0.to_string())
    }
}

/// Switches one appliance.
pub struct ApplianceHandler {
    appliances: Arc<dyn ApplianceController>,
    device: Device,
    state: PowerState,
}

impl ApplianceHandler {
    pub fn new(appliances: Arc<dyn ApplianceController>, device: Device, state: PowerState) -> Self {
        Self {
            appliances,
            device,
            state,
        }
    }
}

#[async_trait]
impl IntentHandler for ApplianceHandler {
    async fn handle(&self, _ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        self.appliances.set_state(self.device, self.state).await?;
        Ok(appliance_reply(self.device, self.state).to_string())
    }
}

fn appliance_reply(device: Device, state: PowerState) -> &'static str {
    match (device, state) {
        (Device::Light, PowerState::On) => "ठीक है, बत्ती चालू कर दी गई है।",
        (Device::Light, PowerState::Off) => "ठीक है, मैंने बत्ती बंद कर दी है।",
        (Device::Fan, PowerState::On) => "ठीक है, पंखा चालू कर दिया गया है।",
        (Device::Fan, PowerState::Off) => "ठीक है, पंखा बंद कर दिया गया है।",
        (Device::Ac, PowerState::On) => "ठीक है, एसी चालू कर दिया गया है।",
        (Device::Ac, PowerState::Off) => "ठीक है, एसी बंद कर दिया गया है।",
    }
}

/// Current time, 12-hour.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeHandler;

#[async_trait]
impl IntentHandler for TimeHandler {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        Ok(format!(
            "अभी समय {} बजकर {} मिनट हो रहा है।",
            hour12(ctx.now.hour()),
            ctx.now.minute()
        ))
    }
}

/// Day of month.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateHandler;

#[async_trait]
impl IntentHandler for DateHandler {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        Ok(format!("आज {} तारीख है।", ctx.now.day()))
    }
}

/// Weekday name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayHandler;

#[async_trait]
impl IntentHandler for DayHandler {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        let day = HINDI_WEEKDAYS[ctx.now.weekday().num_days_from_monday() as usize];
        Ok(format!("आज {} है।", day))
    }
}

/// Weather or room temperature from the sensor.
pub struct TemperatureHandler {
    devices: Devices,
    weather: bool,
}

impl TemperatureHandler {
    /// "Weather" phrasing.
    pub fn weather(devices: Devices) -> Self {
        Self {
            devices,
            weather: true,
        }
    }

    /// Room temperature phrasing.
    pub fn room(devices: Devices) -> Self {
        Self {
            devices,
            weather: false,
        }
    }
}

#[async_trait]
impl IntentHandler for TemperatureHandler {
    async fn handle(&self, _ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        let celsius = self.devices.temperature_or_fallback().await;
        Ok(if self.weather {
            format!("आज मौसम साफ है और तापमान {} डिग्री है।", celsius)
        } else {
            format!("अभी कमरे का तापमान {} डिग्री सेल्सियस है।", celsius)
        })
    }
}

pub struct VolumeHandler {
    volume: Arc<dyn VolumeControl>,
    delta_percent: i32,
}

impl VolumeHandler {
    pub fn up(volume: Arc<dyn VolumeControl>) -> Self {
        Self {
            volume,
            delta_percent: VOLUME_STEP_PERCENT,
        }
    }

    pub fn down(volume: Arc<dyn VolumeControl>) -> Self {
        Self {
            volume,
            delta_percent: -VOLUME_STEP_PERCENT,
        }
    }
}

#[async_trait]
impl IntentHandler for VolumeHandler {
    async fn handle(&self, _ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        self.volume.change_volume(self.delta_percent).await?;
        Ok(if self.delta_percent >= 0 {
            "मैंने आवाज़ बढ़ा दी है।".to_string()
        } else {
            "मैंने आवाज़ कम कर दी है।".to_string()
        })
    }
}

/// Extracts a trigger time and persists an alarm or reminder.
pub struct ScheduleHandler {
    kind: EventKind,
    store: StoreHandle,
    extractor: TemporalExtractor,
}

impl ScheduleHandler {
    pub fn alarm(store: StoreHandle) -> Self {
        Self {
            kind: EventKind::Alarm,
            store,
            extractor: TemporalExtractor::new(),
        }
    }

    pub fn reminder(store: StoreHandle) -> Self {
        Self {
            kind: EventKind::Reminder,
            store,
            extractor: TemporalExtractor::new(),
        }
    }

    fn build_event(&self, expr: &TemporalExpression, now: NaiveDateTime) -> (ScheduledEvent, String) {
        let spoken_label = expr.label.spoken();
        let (message, reply) = match (self.kind, expr.kind) {
            (EventKind::Alarm, TemporalKind::Relative { minutes }) => (
                "आपका अलार्म का समय हो गया है।".to_string(),
                format!("ठीक है, मैंने {} मिनट का अलार्म सेट कर दिया है।", minutes),
            ),
            (EventKind::Alarm, TemporalKind::Absolute { .. }) => (
                "आपका अलार्म का समय हो गया है।".to_string(),
                format!(
                    "ठीक है, मैंने {} {} का अलार्म सेट कर दिया है।",
                    spoken_day(expr.trigger_at, now),
                    spoken_clock(expr.trigger_at)
                ),
            ),
            (EventKind::Reminder, TemporalKind::Relative { minutes }) => (
                format!("आपके {} मिनट पूरे हो गए हैं।", minutes),
                format!("ठीक है, मैंने {} मिनट का रिमाइंडर सेट कर दिया है।", minutes),
            ),
            (EventKind::Reminder, TemporalKind::Absolute { .. }) => (
                format!("आपके {} रिमाइंडर का समय हो गया है।", spoken_label),
                format!(
                    "ठीक है, मैंने {} {} के लिए आपके {} रिमाइंडर को सुरक्षित कर लिया है।",
                    spoken_day(expr.trigger_at, now),
                    spoken_clock(expr.trigger_at),
                    spoken_label
                ),
            ),
        };

        let event = ScheduledEvent::new(self.kind, expr.trigger_at, message, now).with_label(expr.label);
        (event, reply)
    }
}

#[async_trait]
impl IntentHandler for ScheduleHandler {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> VaaniResult<String> {
        let expr = self.extractor.extract(ctx.segment, ctx.now);
        let (event, reply) = self.build_event(&expr, ctx.now);

        info!(
            event_id = %event.id,
            kind = %event.kind,
            label = %event.label,
            trigger_time = %event.trigger_time,
            "Scheduling event"
        );
        self.store.append(event).await?;
        Ok(reply)
    }
}

fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// "6 बजे" or "6 बजकर 30 मिनट".
fn spoken_clock(at: NaiveDateTime) -> String {
    let hour = hour12(at.hour());
    if at.minute() == 0 {
        format!("{} बजे", hour)
    } else {
        format!("{} बजकर {} मिनट", hour, at.minute())
    }
}

fn spoken_day(at: NaiveDateTime, now: NaiveDateTime) -> String {
    match (at.date() - now.date()).num_days() {
        0 => "आज".to_string(),
        1 => "कल".to_string(),
        2 => "परसों".to_string(),
        _ => format!("{} तारीख", at.day()),
    }
}
