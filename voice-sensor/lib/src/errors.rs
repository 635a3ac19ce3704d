use std::path::PathBuf;

use crate::registry::MeasureHandle;

/// Errors that can occur while driving a speech measure.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// The speech engine could not be constructed or bound to an output.
    ///
    /// This is the only error that is fatal to a measure instance.
    #[error("Speech engine initialization failed")]
    EngineInit {
        /// The underlying error from the speech engine.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An engine call failed after initialization.
    #[error("Speech engine {operation} failed: {message}")]
    Engine {
        /// The engine operation that failed (e.g. "speak", "set_rate").
        operation: &'static str,
        /// Backend-provided description of the failure.
        message: String,
    },

    /// A voice was requested by name but the engine does not know it.
    #[error("Voice not found: {name}")]
    VoiceNotFound { name: String },

    /// The engine reported no installed voices at all.
    #[error("No voices are installed")]
    NoVoicesInstalled,

    /// A handle was used after it was destroyed (or was never issued).
    #[error("Unknown measure handle: {0}")]
    UnknownHandle(MeasureHandle),

    /// A configuration file could not be read.
    #[error("Failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file was not valid TOML.
    #[error("Failed to parse config")]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },
}

impl SensorError {
    /// Wrap a backend error message for the given engine operation.
    pub fn engine(operation: &'static str, message: impl std::fmt::Display) -> Self {
        SensorError::Engine {
            operation,
            message: message.to_string(),
        }
    }
}

/// Convenience Result type for sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;
