//! The speech measure: voice selection and speech control for one widget.
//!
//! The widget host drives a measure through a fixed lifecycle:
//!
//! | Host call | Method |
//! |-----------|--------|
//! | Initialize | [`SpeechMeasure::create`] |
//! | Reload | [`SpeechMeasure::reload`] |
//! | Update | [`SpeechMeasure::poll`] |
//! | ExecuteBang | [`SpeechMeasure::speak`] |
//! | GetString | [`SpeechMeasure::query_resolved_name`] |
//! | Finalize | `drop` |
//!
//! Calls for one measure never overlap, so the measure holds no locks.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{debug_enabled, ConfigReader, MeasureOptions};
use crate::engine::{SpeechEngine, Utterance};
use crate::errors::Result;
use crate::selection::resolve;
use crate::types::{Gender, VoiceAge, VoiceDescriptor};

/// How long to let a cancellation settle before queueing the next utterance.
///
/// Cancellation is not confirmed by the engine; this only narrows the window
/// in which the old and new utterance can overlap.
pub const CANCEL_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// One speech measure instance and everything it owns.
pub struct SpeechMeasure<E: SpeechEngine> {
    engine: E,
    voices: Vec<VoiceDescriptor>,
    gender: Gender,
    index: i32,
    name: String,
    resolved_name: String,
    pending: Option<Utterance>,
    /// The NUL-terminated UTF-16 copy of `resolved_name` last handed out.
    string_buffer: Option<Vec<u16>>,
}

impl<E: SpeechEngine> SpeechMeasure<E> {
    /// Bind the engine to the default output and enumerate its voices.
    ///
    /// With `Debug=1` every voice is logged at info level, framed and
    /// numbered from 1 in enumeration order.
    ///
    /// ## Errors
    ///
    /// Returns the engine error when output binding or enumeration fails.
    /// The measure cannot be used without its voice list.
    pub fn create(mut engine: E, host: &impl ConfigReader) -> Result<Self> {
        engine.bind_default_output()?;
        let voices = engine.voices()?;
        debug!(voice_count = voices.len(), "Speech measure created");

        if debug_enabled(host) {
            log_voices(&voices);
        }

        Ok(Self {
            engine,
            voices,
            gender: Gender::Unset,
            index: 0,
            name: String::new(),
            resolved_name: String::new(),
            pending: None,
            string_buffer: None,
        })
    }

    /// Re-read the measure's options and resolve the voice selector.
    ///
    /// Volume and rate are pushed to the engine immediately and apply to the
    /// next utterance. An unmatched selector leaves the resolved name empty
    /// and logs a single warning; speech then falls back to hint-based
    /// selection.
    ///
    /// ## Errors
    ///
    /// Returns the first engine error from applying volume or rate. The
    /// selector and resolved name are updated even then.
    pub fn reload(&mut self, host: &impl ConfigReader) -> Result<()> {
        let options = MeasureOptions::read(host);

        self.gender = options.selector.gender;
        self.index = options.selector.index;
        self.name = options.selector.name.clone();

        self.resolved_name = resolve(&self.voices, &options.selector)
            .map(|voice| voice.name.clone())
            .unwrap_or_default();

        if self.resolved_name.is_empty() {
            warn!(
                name = %self.name,
                gender = %self.gender,
                index = self.index,
                "Speech.dll: Invalid Name, Gender and/or Index. Using best matching valid voice."
            );
        } else {
            debug!(
                voice = %self.resolved_name,
                volume = options.volume.get(),
                rate = options.rate.get(),
                "Voice resolved"
            );
        }

        let volume = self.engine.set_volume(options.volume);
        let rate = self.engine.set_rate(options.rate);
        volume.and(rate)
    }

    /// Number of voices enumerated at creation.
    pub fn poll(&self) -> f64 {
        self.voices.len() as f64
    }

    /// Speak `text`, replacing any utterance still in flight.
    ///
    /// Returns once the new utterance is queued; it never waits for speech
    /// to finish.
    pub fn speak(&mut self, text: &str) -> Result<()> {
        if let Some(previous) = self.pending
            && !self.engine.is_completed(&previous)
        {
            debug!(utterance = previous.id(), "Cancelling active utterance");
            self.engine.cancel_all()?;
            thread::sleep(CANCEL_SETTLE_DELAY);
        }

        if self.resolved_name.is_empty() {
            self.engine
                .select_voice_by_hints(self.gender, VoiceAge::Unset, self.index)?;
        } else {
            self.engine.select_voice(&self.resolved_name)?;
        }

        self.pending = Some(self.engine.speak_async(text)?);
        Ok(())
    }

    /// The voice chosen by the last reload; empty when nothing matched.
    pub fn resolved_name(&self) -> &str {
        &self.resolved_name
    }

    /// The resolved name as a NUL-terminated UTF-16 buffer owned by the
    /// measure.
    ///
    /// The buffer returned by the previous call is released first, so at
    /// most one is alive per measure.
    pub fn query_resolved_name(&mut self) -> &[u16] {
        self.string_buffer = None;
        let wide: Vec<u16> = self
            .resolved_name
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();
        self.string_buffer.insert(wide).as_slice()
    }

    /// Whether no utterance is playing.
    pub fn is_idle(&self) -> bool {
        self.pending
            .is_none_or(|utterance| self.engine.is_completed(&utterance))
    }

    /// Stop tracking the pending utterance so dropping the measure leaves it
    /// playing.
    ///
    /// The next [`speak`](SpeechMeasure::speak) no longer cancels it either.
    pub fn detach_pending(&mut self) {
        if let Some(utterance) = self.pending.take() {
            debug!(utterance = utterance.id(), "Detached pending utterance");
        }
    }

    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: SpeechEngine> Drop for SpeechMeasure<E> {
    fn drop(&mut self) {
        if let Some(utterance) = self.pending.take()
            && !self.engine.is_completed(&utterance)
            && let Err(e) = self.engine.cancel_all()
        {
            warn!(error = %e, "Failed to cancel speech while releasing measure");
        }
    }
}

fn log_voices(voices: &[VoiceDescriptor]) {
    info!("------------------------------");
    info!("* Speech.dll - installed voices");

    for (position, voice) in voices.iter().enumerate() {
        info!("Index: {}", position + 1);
        info!("  Name          : {}", voice.name);
        info!("  Gender        : {}", voice.gender);
        info!("  Culture       : {}", voice.locale);
        info!("  Age           : {}", voice.age);
        info!("  Description   : {}", voice.description.as_deref().unwrap_or(""));
        info!("  ID            : {}", voice.identifier.as_deref().unwrap_or(""));
        info!("  Enabled       : {}", voice.enabled);
    }

    info!("------------------------------");
}

// ============================================================================
// Tests
// ============================================================================
