//! Acting on resolved intents.
//!
//! - `devices`: appliance, sensor and volume traits plus simulated backends
//! - `handlers`: one handler per intent family, each producing a Hindi reply
//! - `dispatcher`: the intent-keyed handler table

mod devices;
mod dispatcher;
mod handlers;

pub use devices::{
    ApplianceController, Device, Devices, LoggingFireHandler, PowerState, SimulatedAppliances,
    SimulatedTemperatureSensor, SimulatedVolume, TemperatureSensor, VolumeControl,
    FALLBACK_TEMPERATURE_C,
};
pub use dispatcher::{DispatchOutcome, Dispatcher, SegmentReply};
pub use handlers::{
    ApplianceHandler, DateHandler, DayHandler, HandlerContext, IntentHandler, ScheduleHandler,
    StaticReply, TemperatureHandler, TimeHandler, VolumeHandler, ALARM_STOP_REPLY, FAILURE_REPLY,
    RAIN_REPLY, TRANSLATE_REPLY, UNKNOWN_REPLY, VOLUME_STEP_PERCENT,
};
