//! Speech engine backends.
//!
//! The measure talks to the synthesizer only through [`SpeechEngine`]. Two
//! backends ship with the crate:
//! - [`NativeEngine`] (feature `native`) drives the operating system's
//!   speech service through the `tts` crate
//! - [`MemoryEngine`] records calls against a fixed voice list, for tests and
//!   dry runs

mod memory;
#[cfg(feature = "native")]
mod native;

pub use memory::{EngineEvent, MemoryEngine};
#[cfg(feature = "native")]
pub use native::NativeEngine;

use crate::errors::{Result, SensorError};
use crate::selection::best_match;
use crate::types::{Gender, Rate, VoiceAge, VoiceDescriptor, Volume};

/// One asynchronous speak operation handed out by an engine.
///
/// Engines number their utterances; the id is only meaningful to the engine
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Utterance {
    id: u64,
}

impl Utterance {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A speech synthesizer the measure can drive.
///
/// Calls are made serially by a single owner; implementations do not need
/// interior locking. Speech itself is rendered on the engine's own thread, so
/// [`speak_async`](SpeechEngine::speak_async) must return as soon as the
/// utterance is queued.
pub trait SpeechEngine {
    /// Enumerate installed voices in the engine's own order.
    fn voices(&self) -> Result<Vec<VoiceDescriptor>>;

    /// Route output to the default audio device.
    fn bind_default_output(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()>;

    fn set_rate(&mut self, rate: Rate) -> Result<()>;

    /// Select a voice by its exact installed name.
    fn select_voice(&mut self, name: &str) -> Result<()>;

    /// Select a voice from gender/age hints plus an alternate slot.
    ///
    /// The default implementation picks with
    /// [`best_match`](crate::selection::best_match) and then selects that
    /// voice by name.
    fn select_voice_by_hints(&mut self, gender: Gender, age: VoiceAge, alternate: i32) -> Result<()> {
        let voices = self.voices()?;
        let voice = best_match(&voices, gender, age, alternate).ok_or(SensorError::NoVoicesInstalled)?;
        let name = voice.name.clone();
        self.select_voice(&name)
    }

    /// Queue `text` with the current voice, volume and rate.
    fn speak_async(&mut self, text: &str) -> Result<Utterance>;

    /// Whether `utterance` has finished, either by completing or by being
    /// cancelled.
    fn is_completed(&self, utterance: &Utterance) -> bool;

    /// Request cancellation of all queued and playing speech.
    ///
    /// Fire-and-forget: the request may still be settling when this returns.
    fn cancel_all(&mut self) -> Result<()>;
}
