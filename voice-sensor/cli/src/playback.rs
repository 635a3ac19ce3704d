use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
#[cfg(feature = "native")]
use voice_sensor::NativeEngine;
use voice_sensor::{MemoryEngine, SpeechEngine, SpeechMeasure};

/// How often a waiting terminal host checks for finished speech.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Engines the terminal host can wait on.
pub trait Playback: SpeechEngine {
    /// Let queued speech play out on its own.
    fn play_out(&mut self) {}

    /// Whether `is_completed` ever reports `true` for the latest utterance.
    fn tracks_completion(&self) -> bool {
        true
    }
}

impl Playback for MemoryEngine {
    fn play_out(&mut self) {
        self.finish_all();
    }
}

#[cfg(feature = "native")]
impl Playback for NativeEngine {
    fn tracks_completion(&self) -> bool {
        NativeEngine::tracks_completion(self)
    }
}

/// Block until the measure has no speech in flight.
///
/// When the engine cannot tell, the pending utterance is detached instead so
/// that releasing the measure does not cut it off.
pub fn wait_until_idle<E: Playback>(measure: &mut SpeechMeasure<E>) {
    if !measure.engine().tracks_completion() {
        warn!("Speech engine cannot report completion, not waiting");
        measure.detach_pending();
        return;
    }

    measure.engine_mut().play_out();
    while !measure.is_idle() {
        thread::sleep(IDLE_POLL_INTERVAL);
    }
    debug!("Speech finished");
}
