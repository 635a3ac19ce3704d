use tracing::info;

use super::{SpeechEngine, Utterance};
use crate::errors::{Result, SensorError};
use crate::types::{Gender, Rate, VoiceAge, VoiceDescriptor, Volume};

/// A call observed by [`MemoryEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    BindDefaultOutput,
    SetVolume(u8),
    SetRate(i8),
    SelectVoice(String),
    Speak {
        voice: Option<String>,
        text: String,
    },
    CancelAll,
}

/// An engine that plays nothing and remembers everything.
///
/// Utterances stay active until [`finish_all`](MemoryEngine::finish_all) or
/// [`cancel_all`](SpeechEngine::cancel_all) is called, which makes overlap
/// between utterances observable through
/// [`max_concurrent`](MemoryEngine::max_concurrent).
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    voices: Vec<VoiceDescriptor>,
    events: Vec<EngineEvent>,
    current_voice: Option<String>,
    volume: Option<Volume>,
    rate: Option<Rate>,
    active: Vec<Utterance>,
    next_id: u64,
    max_concurrent: usize,
}

impl MemoryEngine {
    pub fn new(voices: Vec<VoiceDescriptor>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    /// A small desktop-style voice set, used by dry runs.
    pub fn sample() -> Self {
        Self::new(vec![
            VoiceDescriptor::new("Microsoft David Desktop")
                .with_gender(Gender::Male)
                .with_age(VoiceAge::Adult)
                .with_locale("en-US")
                .with_identifier("TTS_MS_EN-US_DAVID_11.0")
                .with_description("Microsoft David Desktop - English (United States)"),
            VoiceDescriptor::new("Microsoft Zira Desktop")
                .with_gender(Gender::Female)
                .with_age(VoiceAge::Adult)
                .with_locale("en-US")
                .with_identifier("TTS_MS_EN-US_ZIRA_11.0")
                .with_description("Microsoft Zira Desktop - English (United States)"),
            VoiceDescriptor::new("Microsoft George Desktop")
                .with_gender(Gender::Male)
                .with_age(VoiceAge::Adult)
                .with_locale("en-GB")
                .with_identifier("TTS_MS_EN-GB_GEORGE_11.0")
                .with_description("Microsoft George Desktop - English (Great Britain)"),
            VoiceDescriptor::new("Microsoft Hazel Desktop")
                .with_gender(Gender::Female)
                .with_age(VoiceAge::Adult)
                .with_locale("en-GB")
                .with_identifier("TTS_MS_EN-GB_HAZEL_11.0")
                .with_description("Microsoft Hazel Desktop - English (Great Britain)"),
        ])
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Texts spoken so far, paired with the voice selected at the time.
    pub fn spoken(&self) -> Vec<(Option<String>, String)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Speak { voice, text } => Some((voice.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn current_voice(&self) -> Option<&str> {
        self.current_voice.as_deref()
    }

    pub fn volume(&self) -> Option<Volume> {
        self.volume
    }

    pub fn rate(&self) -> Option<Rate> {
        self.rate
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// The most utterances ever active at the same time.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Mark every active utterance as having played to the end.
    pub fn finish_all(&mut self) {
        self.active.clear();
    }
}

impl SpeechEngine for MemoryEngine {
    fn voices(&self) -> Result<Vec<VoiceDescriptor>> {
        Ok(self.voices.clone())
    }

    fn bind_default_output(&mut self) -> Result<()> {
        self.events.push(EngineEvent::BindDefaultOutput);
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        self.volume = Some(volume);
        self.events.push(EngineEvent::SetVolume(volume.get()));
        Ok(())
    }

    fn set_rate(&mut self, rate: Rate) -> Result<()> {
        self.rate = Some(rate);
        self.events.push(EngineEvent::SetRate(rate.get()));
        Ok(())
    }

    fn select_voice(&mut self, name: &str) -> Result<()> {
        let voice = self
            .voices
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| SensorError::VoiceNotFound { name: name.to_string() })?;
        self.current_voice = Some(voice.name.clone());
        self.events.push(EngineEvent::SelectVoice(voice.name.clone()));
        Ok(())
    }

    fn speak_async(&mut self, text: &str) -> Result<Utterance> {
        self.next_id += 1;
        let utterance = Utterance::new(self.next_id);

        info!(
            voice = self.current_voice.as_deref().unwrap_or("<default>"),
            text, "dry-run speak"
        );
        self.events.push(EngineEvent::Speak {
            voice: self.current_voice.clone(),
            text: text.to_string(),
        });

        self.active.push(utterance);
        self.max_concurrent = self.max_concurrent.max(self.active.len());
        Ok(utterance)
    }

    fn is_completed(&self, utterance: &Utterance) -> bool {
        !self.active.contains(utterance)
    }

    fn cancel_all(&mut self) -> Result<()> {
        self.events.push(EngineEvent::CancelAll);
        self.active.clear();
        Ok(())
    }
}
