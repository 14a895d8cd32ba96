//! Hardware boundary: relays, the temperature sensor and the audio mixer.
//!
//! Real GPIO/ALSA backends live outside this crate; the simulated implementations
//! here log every call and are what the CLI wires in by default.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString, IntoStaticStr};
use tracing::{info, warn};

use crate::error::VaaniResult;
use crate::events::{FireHandler, FiredEvent};

/// Reading used when the sensor fails.
pub const FALLBACK_TEMPERATURE_C: i32 = 25;

/// Switchable appliance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Device {
    Light,
    Fan,
    Ac,
}

/// Relay state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    On,
    Off,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplianceController: Send + Sync {
    async fn set_state(&self, device: Device, state: PowerState) -> VaaniResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemperatureSensor: Send + Sync {
    /// Room temperature in whole degrees Celsius.
    async fn read_celsius(&self) -> VaaniResult<i32>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VolumeControl: Send + Sync {
    /// Change output volume by `delta_percent` (negative lowers it).
    async fn change_volume(&self, delta_percent: i32) -> VaaniResult<()>;
}

/// Appliance controller that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedAppliances;

#[async_trait]
impl ApplianceController for SimulatedAppliances {
    async fn set_state(&self, device: Device, state: PowerState) -> VaaniResult<()> {
        info!(%device, %state, "Simulated appliance switched");
        Ok(())
    }
}

/// Sensor returning a random 24–28 °C reading.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedTemperatureSensor;

#[async_trait]
impl TemperatureSensor for SimulatedTemperatureSensor {
    async fn read_celsius(&self) -> VaaniResult<i32> {
        let reading = rand::thread_rng().gen_range(24..=28);
        info!(celsius = reading, "Simulated temperature read");
        Ok(reading)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedVolume;

#[async_trait]
impl VolumeControl for SimulatedVolume {
    async fn change_volume(&self, delta_percent: i32) -> VaaniResult<()> {
        info!(delta_percent, "Simulated volume changed");
        Ok(())
    }
}

/// Fire handler that writes fired events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingFireHandler;

#[async_trait]
impl FireHandler for LoggingFireHandler {
    async fn fire(&self, fired: &FiredEvent) -> VaaniResult<()> {
        let event = &fired.event;
        if fired.lateness_secs() > 60 {
            warn!(event_id = %event.id, late_secs = fired.lateness_secs(), "Firing late event");
        }
        info!(
            event_id = %event.id,
            kind = %event.kind,
            label = %event.label,
            message = %event.message,
            "ALARM"
        );
        Ok(())
    }
}

/// The set of device backends handlers talk to.
#[derive(Clone)]
pub struct Devices {
    pub appliances: Arc<dyn ApplianceController>,
    pub sensor: Arc<dyn TemperatureSensor>,
    pub volume: Arc<dyn VolumeControl>,
}

impl Devices {
    /// Simulated backends that only log.
    pub fn simulated() -> Self {
        Self {
            appliances: Arc::new(SimulatedAppliances),
            sensor: Arc::new(SimulatedTemperatureSensor),
            volume: Arc::new(SimulatedVolume),
        }
    }

    /// Sensor reading, or [`FALLBACK_TEMPERATURE_C`] when the read fails.
    pub async fn temperature_or_fallback(&self) -> i32 {
        match self.sensor.read_celsius().await {
            Ok(celsius) => celsius,
            Err(e) => {
                warn!(error = %e, fallback = FALLBACK_TEMPERATURE_C, "Sensor read failed");
                FALLBACK_TEMPERATURE_C
            }
        }
    }
}

impl Default for Devices {
    fn default() -> Self {
        Self::simulated()
    }
}
