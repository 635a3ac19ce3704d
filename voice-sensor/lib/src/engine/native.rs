//! Operating system speech engine via the `tts` crate.
//!
//! The `tts` crate picks the platform service at runtime: SAPI/WinRT on
//! Windows, AVFoundation on macOS and Speech Dispatcher on Linux. Not every
//! backend supports every control, so unsupported calls are skipped with a
//! debug event instead of failing the measure.

use tracing::{debug, trace};
use tts::Tts;

use super::{SpeechEngine, Utterance};
use crate::errors::{Result, SensorError};
use crate::gender_inference::infer_gender;
use crate::types::{Gender, Rate, VoiceDescriptor, Volume};

/// The host's native text-to-speech service.
pub struct NativeEngine {
    tts: Tts,
    /// Id of the most recently queued utterance; zero before the first one.
    issued: u64,
}

impl NativeEngine {
    /// Connect to the platform speech service.
    ///
    /// ## Errors
    ///
    /// Returns `SensorError::EngineInit` when no speech backend is available.
    pub fn new() -> Result<Self> {
        let tts = Tts::default().map_err(|e| SensorError::EngineInit {
            source: e.to_string().into(),
        })?;
        debug!(features = ?tts.supported_features(), "Speech engine initialized");

        Ok(Self { tts, issued: 0 })
    }

    /// Whether the backend can report when an utterance has finished.
    ///
    /// Without it every utterance counts as still playing, so the next one
    /// always cancels first.
    pub fn tracks_completion(&self) -> bool {
        self.tts.supported_features().is_speaking
    }

    fn describe(&self, voice: &tts::Voice) -> VoiceDescriptor {
        let name = voice.name();
        let gender = match voice.gender() {
            Some(tts::Gender::Male) => Gender::Male,
            Some(tts::Gender::Female) => Gender::Female,
            None => infer_gender(&name),
        };

        let id = voice.id();
        let mut descriptor = VoiceDescriptor::new(name.clone())
            .with_gender(gender)
            .with_locale(voice.language().to_string());
        if id != name {
            descriptor = descriptor.with_identifier(id);
        }
        descriptor
    }

    /// Map 0..=100 onto the backend's volume range.
    fn scale_volume(&self, volume: Volume) -> f32 {
        let min = self.tts.min_volume();
        let max = self.tts.max_volume();
        min + (max - min) * f32::from(volume.get()) / 100.0
    }

    /// Map -10..=10 onto the backend's rate range, with 0 at its normal rate.
    fn scale_rate(&self, rate: Rate) -> f32 {
        let normal = self.tts.normal_rate();
        let step = f32::from(rate.get()) / 10.0;
        if step < 0.0 {
            normal + (normal - self.tts.min_rate()) * step
        } else {
            normal + (self.tts.max_rate() - normal) * step
        }
    }
}

impl SpeechEngine for NativeEngine {
    fn voices(&self) -> Result<Vec<VoiceDescriptor>> {
        let voices = self
            .tts
            .voices()
            .map_err(|e| SensorError::engine("voices", e))?;

        let descriptors: Vec<VoiceDescriptor> = voices.iter().map(|v| self.describe(v)).collect();
        debug!(voice_count = descriptors.len(), "Enumerated voices");
        Ok(descriptors)
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        if !self.tts.supported_features().volume {
            debug!(volume = volume.get(), "Backend has no volume control, skipping");
            return Ok(());
        }

        let value = self.scale_volume(volume);
        trace!(volume = volume.get(), backend_volume = value, "Setting volume");
        self.tts
            .set_volume(value)
            .map_err(|e| SensorError::engine("set_volume", e))?;
        Ok(())
    }

    fn set_rate(&mut self, rate: Rate) -> Result<()> {
        if !self.tts.supported_features().rate {
            debug!(rate = rate.get(), "Backend has no rate control, skipping");
            return Ok(());
        }

        let value = self.scale_rate(rate);
        trace!(rate = rate.get(), backend_rate = value, "Setting rate");
        self.tts
            .set_rate(value)
            .map_err(|e| SensorError::engine("set_rate", e))?;
        Ok(())
    }

    fn select_voice(&mut self, name: &str) -> Result<()> {
        if !self.tts.supported_features().voice {
            debug!(voice = name, "Backend has no voice selection, skipping");
            return Ok(());
        }

        let voices = self
            .tts
            .voices()
            .map_err(|e| SensorError::engine("voices", e))?;
        let voice = voices
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| SensorError::VoiceNotFound { name: name.to_string() })?;

        self.tts
            .set_voice(voice)
            .map_err(|e| SensorError::engine("set_voice", e))
    }

    fn speak_async(&mut self, text: &str) -> Result<Utterance> {
        self.tts
            .speak(text, false)
            .map_err(|e| SensorError::engine("speak", e))?;

        self.issued += 1;
        Ok(Utterance::new(self.issued))
    }

    fn is_completed(&self, utterance: &Utterance) -> bool {
        if utterance.id() != self.issued {
            return true;
        }
        if !self.tts.supported_features().is_speaking {
            return false;
        }
        !self.tts.is_speaking().unwrap_or(false)
    }

    fn cancel_all(&mut self) -> Result<()> {
        if !self.tts.supported_features().stop {
            debug!("Backend cannot stop speech, skipping");
            return Ok(());
        }

        self.tts
            .stop()
            .map_err(|e| SensorError::engine("stop", e))?;
        Ok(())
    }
}
