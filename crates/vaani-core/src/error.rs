//! Error types for vaani operations.
//!
//! Classification misses and missing time expressions are not errors: they
//! resolve to `UNKNOWN_COMMAND` and documented defaults. The variants here
//! cover the places where the outside world can actually fail us: the store
//! file, configuration, taxonomy files and device calls.

use thiserror::Error;

/// Result type alias for vaani operations.
pub type VaaniResult<T> = Result<T, VaaniError>;

/// Main error type for all vaani operations.
#[derive(Error, Debug)]
pub enum VaaniError {
    /// Event store read or write failed.
    #[error("Event store error: {message}")]
    Store {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Taxonomy could not be loaded or is invalid.
    #[error("Taxonomy error: {message}")]
    Taxonomy { message: String, code: ErrorCode },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Appliance or sensor call failed.
    #[error("Device error: {message}")]
    Device {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A background task is gone (store actor or scheduler stopped).
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Store (STORE_xxx)
    StoreReadFailed,
    StoreWriteFailed,
    StoreCorrupted,

    // Taxonomy (TAX_xxx)
    TaxEmpty,
    TaxUnknownIntent,
    TaxInvalidFormat,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Device (DEV_xxx)
    DevActuatorFailed,
    DevSensorFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::StoreReadFailed => "STORE_001",
            ErrorCode::StoreWriteFailed => "STORE_002",
            ErrorCode::StoreCorrupted => "STORE_003",
            ErrorCode::TaxEmpty => "TAX_001",
            ErrorCode::TaxUnknownIntent => "TAX_002",
            ErrorCode::TaxInvalidFormat => "TAX_003",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::DevActuatorFailed => "DEV_001",
            ErrorCode::DevSensorFailed => "DEV_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl VaaniError {
    /// Create a store error wrapping an underlying cause.
    pub fn store_with_source(
        message: impl Into<String>,
        code: ErrorCode,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            code,
            source: Some(Box::new(source)),
        }
    }

    /// Create a taxonomy error.
    pub fn taxonomy(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Taxonomy {
            message: message.into(),
            code,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a device error.
    pub fn device(message: impl Into<String>) -> Self {
        Self::Device {
            message: message.into(),
            code: ErrorCode::DevActuatorFailed,
            source: None,
        }
    }

    /// Create a sensor error.
    pub fn sensor(message: impl Into<String>) -> Self {
        Self::Device {
            message: message.into(),
            code: ErrorCode::DevSensorFailed,
            source: None,
        }
    }

    /// Create a channel-closed error.
    pub fn channel_closed(what: impl Into<String>) -> Self {
        Self::ChannelClosed(what.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Store { code, .. } => *code,
            Self::Taxonomy { code, .. } => *code,
            Self::Device { code, .. } => *code,
            Self::Io(_) => ErrorCode::StoreReadFailed,
            Self::Serialization(_) => ErrorCode::ParseInvalidJson,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Store { .. } => Some("Check that the store directory exists and is writable"),
            Self::Taxonomy { .. } => {
                Some("Every intent in a taxonomy file needs at least one example phrase")
            }
            Self::Configuration(_) => Some("Use a .toml, .json or .yaml config file"),
            Self::ChannelClosed(_) => Some("The background runtime was shut down"),
            _ => None,
        }
    }
}
