//! vaani-core - Core library for vaani.
//!
//! Resolves transcribed Hindi/Hinglish utterances into a closed set of
//! intents, extracts times for alarms and reminders, and fires persisted
//! events from a background timekeeper.
//!
//! # Example
//!
//! ```ignore
//! use vaani_core::{BackgroundRuntime, CommandResolver, Devices, Dispatcher, VaaniConfig};
//!
//! let config = VaaniConfig::from_env();
//! let runtime = BackgroundRuntime::new(config.clone()).await?;
//! runtime.start().await?;
//!
//! let resolver = CommandResolver::with_taxonomy(config.load_taxonomy()?, config.confidence_threshold);
//! let dispatcher = Dispatcher::standard(Devices::simulated(), runtime.store());
//!
//! let matches = resolver.resolve("batti on karo aur 5 minute ka alarm lagao");
//! let outcome = dispatcher.dispatch(&matches).await;
//! println!("{}", outcome.spoken);
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod nlu;
pub mod runtime;
pub mod temporal;

// Re-export commonly used types
pub use config::VaaniConfig;
pub use dispatch::{
    ApplianceController, DispatchOutcome, Dispatcher, Devices, IntentHandler, LoggingFireHandler,
    TemperatureSensor, VolumeControl,
};
pub use error::{ErrorCode, VaaniError, VaaniResult};
pub use events::{
    EventKind, EventStatus, EventStore, FireHandler, FiredEvent, JsonEventStore, ScheduledEvent,
    StoreHandle, Timekeeper,
};
pub use nlu::{CommandResolver, Intent, IntentMatch, Taxonomy};
pub use runtime::BackgroundRuntime;
pub use temporal::{EventLabel, TemporalExpression, TemporalExtractor};
