//! Routing `tracing` events into the widget host's log.
//!
//! The host has its own log window with four levels. [`HostLogLayer`] turns
//! every event recorded while the layer is active into a single line and
//! hands it to a [`LogSink`].

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Log levels understood by the widget host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostLogLevel {
    Error = 1,
    Warning = 2,
    Notice = 3,
    Debug = 4,
}

impl HostLogLevel {
    /// The short label the host prints in front of each line.
    pub fn label(&self) -> &'static str {
        match self {
            HostLogLevel::Error => "ERRO",
            HostLogLevel::Warning => "WARN",
            HostLogLevel::Notice => "NOTE",
            HostLogLevel::Debug => "DBUG",
        }
    }
}

impl From<Level> for HostLogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => HostLogLevel::Error,
            Level::WARN => HostLogLevel::Warning,
            Level::INFO => HostLogLevel::Notice,
            _ => HostLogLevel::Debug,
        }
    }
}

/// Somewhere host log lines can be written.
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, level: HostLogLevel, message: &str);
}

/// A `tracing` layer that forwards events to a [`LogSink`].
///
/// ## Examples
///
/// ```
/// use tracing_subscriber::prelude::*;
/// use voice_sensor::host::{HostLogLayer, HostLogLevel, LogSink};
///
/// struct Stderr;
///
/// impl LogSink for Stderr {
///     fn log(&self, level: HostLogLevel, message: &str) {
///         eprintln!("{} {message}", level.label());
///     }
/// }
///
/// let subscriber = tracing_subscriber::registry().with(HostLogLayer::new(Stderr));
/// tracing::subscriber::with_default(subscriber, || tracing::warn!("hello"));
/// ```
pub struct HostLogLayer<S> {
    sink: S,
}

impl<S: LogSink> HostLogLayer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S, Sub> Layer<Sub> for HostLogLayer<S>
where
    S: LogSink,
    Sub: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        self.sink
            .log(HostLogLevel::from(*event.metadata().level()), &line.finish());
    }
}

/// Collects the message first and every other field as ` key=value`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
