//! The `host` command: drive measures declared in a TOML file the way the
//! widget host would.

use std::path::Path;

use color_eyre::eyre::{Context, Result, eyre};
use tracing::info;
use voice_sensor::{HostLogLevel, LogSink, MeasureFile, MeasureHandle, MeasureRegistry};

use crate::output::display_name;
use crate::playback::{Playback, wait_until_idle};

/// Writes host log lines to stderr with the host's level labels.
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn log(&self, level: HostLogLevel, message: &str) {
        eprintln!("{} {message}", level.label());
    }
}

/// Text to speak through one measure, given as `SECTION=TEXT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bang {
    pub section: String,
    pub text: String,
}

pub fn parse_bang(value: &str) -> std::result::Result<Bang, String> {
    let (section, text) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SECTION=TEXT, got '{value}'"))?;
    let section = section.trim();
    if section.is_empty() {
        return Err(format!("missing section name in '{value}'"));
    }

    Ok(Bang {
        section: section.to_string(),
        text: text.to_string(),
    })
}

/// Create every measure in `config`, run `bangs` in order, wait for speech
/// to finish and release the measures.
pub fn run<E: Playback>(
    config: &Path,
    bangs: &[Bang],
    mut new_engine: impl FnMut() -> voice_sensor::Result<E>,
) -> Result<()> {
    let file = MeasureFile::load(config)
        .with_context(|| format!("loading measures from {}", config.display()))?;

    if let Some(bang) = bangs.iter().find(|b| file.get(&b.section).is_none()) {
        return Err(eyre!("Unknown measure section: {}", bang.section));
    }

    let mut registry = MeasureRegistry::new();
    let mut handles: Vec<(&str, MeasureHandle)> = Vec::with_capacity(file.measures.len());

    for (section, options) in &file.measures {
        let handle = registry
            .create(new_engine()?, options)
            .with_context(|| format!("creating measure [{section}]"))?;
        let measure = registry.get_mut(handle)?;
        measure.reload(options)?;

        println!(
            "{section}: update={} string={}",
            measure.poll(),
            display_name(measure.resolved_name())
        );
        handles.push((section, handle));
    }

    for bang in bangs {
        let Some(&(_, handle)) = handles
            .iter()
            .find(|(section, _)| section.eq_ignore_ascii_case(&bang.section))
        else {
            continue;
        };
        info!(section = %bang.section, "ExecuteBang");
        registry.get_mut(handle)?.speak(&bang.text)?;
    }

    for &(_, handle) in &handles {
        wait_until_idle(registry.get_mut(handle)?);
    }
    for (_, handle) in handles {
        registry.destroy(handle)?;
    }

    Ok(())
}
