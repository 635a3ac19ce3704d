//! Opaque handles for in-process hosts.
//!
//! A host that embeds the library directly (rather than loading the plugin)
//! keeps its measures in a [`MeasureRegistry`] and refers to them only by
//! [`MeasureHandle`]. Handles are never reused, so a stale handle fails with
//! `SensorError::UnknownHandle` instead of reaching another measure.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU64;

use tracing::debug;

use crate::config::ConfigReader;
use crate::engine::SpeechEngine;
use crate::errors::{Result, SensorError};
use crate::measure::SpeechMeasure;

/// Identifies one measure inside a [`MeasureRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasureHandle(NonZeroU64);

impl MeasureHandle {
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for MeasureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns every live measure of a host.
pub struct MeasureRegistry<E: SpeechEngine> {
    measures: HashMap<MeasureHandle, SpeechMeasure<E>>,
    last_issued: u64,
}

impl<E: SpeechEngine> Default for MeasureRegistry<E> {
    fn default() -> Self {
        Self {
            measures: HashMap::new(),
            last_issued: 0,
        }
    }
}

impl<E: SpeechEngine> MeasureRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a measure on `engine` and take ownership of it.
    pub fn create(&mut self, engine: E, host: &impl ConfigReader) -> Result<MeasureHandle> {
        let measure = SpeechMeasure::create(engine, host)?;

        let handle = MeasureHandle(NonZeroU64::MIN.saturating_add(self.last_issued));
        self.last_issued += 1;
        self.measures.insert(handle, measure);
        debug!(%handle, "Measure registered");
        Ok(handle)
    }

    pub fn get(&self, handle: MeasureHandle) -> Result<&SpeechMeasure<E>> {
        self.measures
            .get(&handle)
            .ok_or(SensorError::UnknownHandle(handle))
    }

    pub fn get_mut(&mut self, handle: MeasureHandle) -> Result<&mut SpeechMeasure<E>> {
        self.measures
            .get_mut(&handle)
            .ok_or(SensorError::UnknownHandle(handle))
    }

    /// Remove and release a measure, cancelling any speech it has in flight.
    pub fn destroy(&mut self, handle: MeasureHandle) -> Result<()> {
        let measure = self
            .measures
            .remove(&handle)
            .ok_or(SensorError::UnknownHandle(handle))?;
        drop(measure);
        debug!(%handle, "Measure released");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    /// Whether no measure has speech in flight.
    pub fn all_idle(&self) -> bool {
        self.measures.values().all(SpeechMeasure::is_idle)
    }
}
