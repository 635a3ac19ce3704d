use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use voice_sensor::config::{KEY_GENDER, KEY_INDEX, KEY_NAME, KEY_RATE, KEY_VOLUME};
#[cfg(feature = "native")]
use voice_sensor::NativeEngine;
use voice_sensor::{HostLogLayer, MemoryEngine, SpeechEngine, SpeechMeasure};

use crate::host::{Bang, ConsoleSink, parse_bang};
use crate::playback::{Playback, wait_until_idle};

mod host;
mod output;
mod playback;

/// Speak through the system text-to-speech engine the way the desktop
/// widget measure does
#[derive(Debug, Parser)]
#[command(name = "voice-sensor", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Use a fixed in-memory voice set and play nothing
    #[arg(long, global = true)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

const AFTER_HELP: &str = "\
SELECTION:
  --name wins when it matches a voice (case-insensitive). Otherwise --gender
  narrows the list and --index picks the n-th voice (1-based) of what is left.
  With nothing set the first voice is used.

  Examples:
    voice-sensor voices
    voice-sensor resolve --gender female --index 2
    voice-sensor speak --name \"Microsoft Zira Desktop\" --rate 2 Hello there
    voice-sensor host --config measures.toml --bang Narrator=Hello
";

#[derive(Debug, Subcommand)]
enum Command {
    /// List the installed voices in engine order
    Voices {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the voice a selector resolves to
    Resolve(#[command(flatten)] SelectorArgs),

    /// Speak text with the selected voice
    Speak {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Volume, 0 to 100 (out of range resets to 100)
        #[arg(long, allow_negative_numbers = true)]
        volume: Option<i64>,

        /// Rate, -10 to 10 (out of range resets to 0)
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<i64>,

        /// Return as soon as speech has started
        #[arg(long)]
        no_wait: bool,

        /// Text to speak
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Run every measure in a TOML file as the widget host would
    Host {
        /// Measure file; each top-level table is one measure
        #[arg(short, long)]
        config: PathBuf,

        /// Speak through a measure, as SECTION=TEXT (repeatable)
        #[arg(long = "bang", value_name = "SECTION=TEXT", value_parser = parse_bang)]
        bangs: Vec<Bang>,
    },
}

#[derive(Debug, Args)]
struct SelectorArgs {
    /// Voice name (case-insensitive)
    #[arg(long)]
    name: Option<String>,

    /// Voice gender: male or female
    #[arg(long)]
    gender: Option<String>,

    /// 1-based position among the voices that pass the gender filter
    #[arg(long, allow_negative_numbers = true)]
    index: Option<i64>,
}

impl SelectorArgs {
    /// Measure options as the widget host would pass them.
    fn to_options(&self) -> toml::Table {
        let mut options = toml::Table::new();
        if let Some(name) = &self.name {
            options.insert(KEY_NAME.into(), name.clone().into());
        }
        if let Some(gender) = &self.gender {
            options.insert(KEY_GENDER.into(), gender.clone().into());
        }
        if let Some(index) = self.index {
            options.insert(KEY_INDEX.into(), index.into());
        }
        options
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.dry_run {
        return run(cli.command, || Ok(MemoryEngine::sample()));
    }
    run_native(cli.command)
}

#[cfg(feature = "native")]
fn run_native(command: Command) -> Result<()> {
    run(command, NativeEngine::new)
}

#[cfg(not(feature = "native"))]
fn run_native(command: Command) -> Result<()> {
    tracing::warn!("Built without the `native` feature, using the dry-run voices");
    run(command, || Ok(MemoryEngine::sample()))
}

/// Level used when `RUST_LOG` is unset.
///
/// The `host` command starts at `info` so `Debug = 1` measures print their
/// voice listing as notices, like the widget host shows them.
fn default_level(verbose: u8, host: bool) -> &'static str {
    match verbose.saturating_add(u8::from(host)) {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_logging(cli: &Cli) {
    let host = matches!(cli.command, Command::Host { .. });
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(cli.verbose, host)));

    if host {
        tracing_subscriber::registry()
            .with(HostLogLayer::new(ConsoleSink).with_filter(filter))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .init();
    }
}

fn run<E: Playback>(
    command: Command,
    mut new_engine: impl FnMut() -> voice_sensor::Result<E>,
) -> Result<()> {
    match command {
        Command::Voices { json } => {
            let voices = new_engine()?.voices()?;
            if json {
                output::print_json(&voices)?;
            } else {
                output::print_table(&voices);
            }
        }
        Command::Resolve(selector) => {
            let options = selector.to_options();
            let mut measure = SpeechMeasure::create(new_engine()?, &options)?;
            measure.reload(&options)?;
            println!("{}", output::display_name(measure.resolved_name()));
        }
        Command::Speak {
            selector,
            volume,
            rate,
            no_wait,
            text,
        } => {
            let mut options = selector.to_options();
            if let Some(volume) = volume {
                options.insert(KEY_VOLUME.into(), volume.into());
            }
            if let Some(rate) = rate {
                options.insert(KEY_RATE.into(), rate.into());
            }

            let mut measure = SpeechMeasure::create(new_engine()?, &options)?;
            measure.reload(&options)?;
            measure.speak(&text.join(" "))?;
            if no_wait {
                measure.detach_pending();
            } else {
                wait_until_idle(&mut measure);
            }
        }
        Command::Host { config, bangs } => host::run(&config, &bangs, new_engine)?,
    }

    Ok(())
}
