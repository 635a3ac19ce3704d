//! Measure configuration.
//!
//! A measure never parses files itself. The widget host exposes a key reader
//! (see [`ConfigReader`]) and the measure pulls its options through it on
//! creation and on every reload. Terminal hosts feed the same reader from TOML.

use std::path::Path;

use tracing::warn;

use crate::errors::{Result, SensorError};
use crate::types::{Gender, Rate, Selector, Volume};

pub const KEY_NAME: &str = "Name";
pub const KEY_GENDER: &str = "Gender";
pub const KEY_INDEX: &str = "Index";
pub const KEY_VOLUME: &str = "Volume";
pub const KEY_RATE: &str = "Rate";
pub const KEY_DEBUG: &str = "Debug";

/// Read access to a measure's configuration keys.
///
/// Mirrors the widget host's option reader: every read names a key and a
/// default that is returned when the key is absent or unusable.
pub trait ConfigReader {
    fn read_string(&self, key: &str, default: &str) -> String;

    fn read_int(&self, key: &str, default: i64) -> i64;
}

/// Options read on every reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasureOptions {
    pub selector: Selector,
    pub volume: Volume,
    pub rate: Rate,
}

impl MeasureOptions {
    /// Read all reload-time options, replacing any previous values wholesale.
    ///
    /// An unrecognised `Gender` is logged and treated as unset. Out-of-range
    /// `Volume`/`Rate` values silently fall back to their defaults.
    pub fn read(reader: &impl ConfigReader) -> MeasureOptions {
        let name = reader.read_string(KEY_NAME, "");

        let gender_setting = reader.read_string(KEY_GENDER, "");
        let gender = Gender::parse_setting(&gender_setting).unwrap_or_else(|| {
            warn!(gender = %gender_setting, "Speech.dll: Invalid gender");
            Gender::Unset
        });

        let index = reader
            .read_int(KEY_INDEX, 0)
            .clamp(i32::MIN as i64, i32::MAX as i64) as i32;

        MeasureOptions {
            selector: Selector {
                name,
                gender,
                index,
            },
            volume: Volume::from_setting(reader.read_int(KEY_VOLUME, Volume::MAX)),
            rate: Rate::from_setting(reader.read_int(KEY_RATE, 0)),
        }
    }
}

/// Whether the creation-time voice listing was requested (`Debug=1`).
pub fn debug_enabled(reader: &impl ConfigReader) -> bool {
    reader.read_int(KEY_DEBUG, 0) == 1
}

// ============================================================================
// TOML-backed reader
// ============================================================================

/// Look up a key case-insensitively, the way the widget host does.
fn lookup<'a>(table: &'a toml::Table, key: &str) -> Option<&'a toml::Value> {
    table.get(key).or_else(|| {
        table
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

impl ConfigReader for toml::Table {
    fn read_string(&self, key: &str, default: &str) -> String {
        match lookup(self, key) {
            Some(toml::Value::String(value)) => value.clone(),
            Some(toml::Value::Integer(value)) => value.to_string(),
            Some(toml::Value::Float(value)) => value.to_string(),
            Some(toml::Value::Boolean(value)) => u8::from(*value).to_string(),
            _ => default.to_string(),
        }
    }

    fn read_int(&self, key: &str, default: i64) -> i64 {
        match lookup(self, key) {
            Some(toml::Value::Integer(value)) => *value,
            Some(toml::Value::Float(value)) => value.trunc() as i64,
            Some(toml::Value::Boolean(value)) => i64::from(*value),
            Some(toml::Value::String(value)) => value.trim().parse().unwrap_or(default),
            _ => default,
        }
    }
}

/// Measures declared in a TOML file, one top-level table per measure.
///
/// ```toml
/// [Narrator]
/// Gender = "female"
/// Index = 2
/// Volume = 80
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeasureFile {
    pub measures: Vec<(String, toml::Table)>,
}

impl MeasureFile {
    /// Parse measure sections from TOML text, keeping file order.
    ///
    /// Top-level keys that are not tables are ignored.
    pub fn parse(source: &str) -> Result<MeasureFile> {
        let document: toml::Table =
            source.parse().map_err(|e| SensorError::ConfigParse { source: e })?;

        let measures = document
            .into_iter()
            .filter_map(|(section, value)| match value {
                toml::Value::Table(table) => Some((section, table)),
                _ => None,
            })
            .collect();

        Ok(MeasureFile { measures })
    }

    pub fn load(path: &Path) -> Result<MeasureFile> {
        let source = std::fs::read_to_string(path).map_err(|e| SensorError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&source)
    }

    pub fn get(&self, section: &str) -> Option<&toml::Table> {
        self.measures
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(section))
            .map(|(_, table)| table)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn table(source: &str) -> toml::Table {
        source.parse().unwrap()
    }

    // ========================================================================
    // Reader
    // ========================================================================

    #[test]
    fn test_keys_are_case_insensitive() {
        let config = table("name = \"Zira\"\nINDEX = 3");
        assert_eq!(config.read_string(KEY_NAME, ""), "Zira");
        assert_eq!(config.read_int(KEY_INDEX, 0), 3);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = toml::Table::new();
        assert_eq!(config.read_string(KEY_NAME, "fallback"), "fallback");
        assert_eq!(config.read_int(KEY_VOLUME, 100), 100);
    }

    #[test]
    fn test_read_int_accepts_numeric_strings_and_floats() {
        let config = table("Index = \" 2 \"\nRate = 3.9\nDebug = true");
        assert_eq!(config.read_int(KEY_INDEX, 0), 2);
        assert_eq!(config.read_int(KEY_RATE, 0), 3);
        assert_eq!(config.read_int(KEY_DEBUG, 0), 1);
    }

    #[test]
    fn test_read_int_falls_back_on_garbage() {
        let config = table("Index = \"second\"");
        assert_eq!(config.read_int(KEY_INDEX, 0), 0);
    }

    // ========================================================================
    // Measure options
    // ========================================================================

    #[test]
    fn test_defaults() {
        let options = MeasureOptions::read(&toml::Table::new());
        assert_eq!(options.selector, Selector::new());
        assert_eq!(options.volume.get(), 100);
        assert_eq!(options.rate.get(), 0);
    }

    #[test]
    fn test_full_selector() {
        let options = MeasureOptions::read(&table(
            "Name = \"Microsoft Zira Desktop\"\nGender = \"female\"\nIndex = 2\nVolume = 40\nRate = -3",
        ));
        assert_eq!(options.selector.name, "Microsoft Zira Desktop");
        assert_eq!(options.selector.gender, Gender::Female);
        assert_eq!(options.selector.index, 2);
        assert_eq!(options.volume.get(), 40);
        assert_eq!(options.rate.get(), -3);
    }

    #[test]
    fn test_out_of_range_volume_and_rate_reset() {
        let options = MeasureOptions::read(&table("Volume = 150\nRate = -15"));
        assert_eq!(options.volume.get(), 100);
        assert_eq!(options.rate.get(), 0);

        let options = MeasureOptions::read(&table("Volume = -5\nRate = 15"));
        assert_eq!(options.volume.get(), 100);
        assert_eq!(options.rate.get(), 0);
    }

    #[test]
    #[traced_test]
    fn test_invalid_gender_warns_and_is_unset() {
        let options = MeasureOptions::read(&table("Gender = \"robot\""));
        assert_eq!(options.selector.gender, Gender::Unset);
        assert!(logs_contain("Speech.dll: Invalid gender"));
    }

    #[test]
    #[traced_test]
    fn test_out_of_range_volume_does_not_warn() {
        MeasureOptions::read(&table("Volume = 500"));
        assert!(!logs_contain("WARN"));
    }

    #[test]
    fn test_debug_flag() {
        assert!(debug_enabled(&table("Debug = 1")));
        assert!(!debug_enabled(&table("Debug = 2")));
        assert!(!debug_enabled(&toml::Table::new()));
    }

    // ========================================================================
    // Measure file
    // ========================================================================

    #[test]
    fn test_measure_file_keeps_section_order() {
        let file = MeasureFile::parse(
            "[Zeta]\nName = \"a\"\n\n[Alpha]\nGender = \"male\"\n",
        )
        .unwrap();
        let names: Vec<&str> = file.measures.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert!(file.get("alpha").is_some());
    }

    #[test]
    fn test_measure_file_rejects_invalid_toml() {
        let err = MeasureFile::parse("[Broken").unwrap_err();
        assert!(matches!(err, SensorError::ConfigParse { .. }));
    }

    #[test]
    fn test_measure_file_missing_path() {
        let err = MeasureFile::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, SensorError::ConfigRead { .. }));
    }
}
