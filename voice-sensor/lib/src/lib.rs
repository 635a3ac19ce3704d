//! Voice Sensor
//!
//! Exposes the operating system's text-to-speech engine as a desktop widget
//! measure: the host polls it for the number of installed voices, queries it
//! for the selected voice name, and sends it text to speak.
//!
//! ## Features
//!
//! - **Voice selection**: name, gender and index selectors resolved against
//!   the engine's own voice order, with hint-based fallback
//! - **Interruptible speech**: a new command cancels the utterance in flight
//! - **Pluggable engines**: the OS engine via the `tts` crate (feature
//!   `native`) or an in-memory engine for tests and dry runs
//! - **Plugin exports**: the widget host ABI (feature `plugin`, Windows)
//!
//! ## Quick Start
//!
//! ```
//! use voice_sensor::{MemoryEngine, SpeechMeasure};
//!
//! let options: toml::Table = "Gender = \"female\"".parse().unwrap();
//!
//! let mut measure = SpeechMeasure::create(MemoryEngine::sample(), &options).unwrap();
//! measure.reload(&options).unwrap();
//! assert_eq!(measure.resolved_name(), "Microsoft Zira Desktop");
//!
//! measure.speak("Hello from the desktop").unwrap();
//! ```
//!
//! ## Module Structure
//!
//! - [`types`] - Voice metadata, selector, volume and rate
//! - [`config`] - Option keys and the [`ConfigReader`] seam
//! - [`selection`] - Selector resolution and hint-based matching
//! - [`engine`] - The [`SpeechEngine`] trait and its backends
//! - [`measure`] - The measure lifecycle
//! - [`registry`] - Handle-based ownership for in-process hosts
//! - [`host`] - Forwarding `tracing` events to the host log

pub mod config;
pub mod engine;
pub mod errors;
pub mod gender_inference;
pub mod host;
pub mod measure;
#[cfg(all(windows, feature = "plugin"))]
mod plugin;
pub mod registry;
pub mod selection;
pub mod types;

pub use config::{ConfigReader, MeasureFile, MeasureOptions};
#[cfg(feature = "native")]
pub use engine::NativeEngine;
pub use engine::{EngineEvent, MemoryEngine, SpeechEngine, Utterance};
pub use errors::{Result, SensorError};
pub use gender_inference::infer_gender;
pub use host::{HostLogLayer, HostLogLevel, LogSink};
pub use measure::{SpeechMeasure, CANCEL_SETTLE_DELAY};
pub use registry::{MeasureHandle, MeasureRegistry};
pub use types::{Gender, Rate, Selector, VoiceAge, VoiceDescriptor, Volume};
