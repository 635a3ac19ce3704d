//! Core types for the voice sensor.
//!
//! This module defines the value types shared by the engine backends, the
//! selector resolution and the measure lifecycle:
//! - Voice metadata as reported by the speech engine
//! - The selector parsed from a measure's configuration
//! - Range-checked volume and rate settings

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Gender
// ============================================================================

/// Gender of a voice, or a gender filter when used in a selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Not reported by the engine, or no filter requested.
    #[default]
    Unset,
    Male,
    Female,
}

impl Gender {
    /// Parse a configuration value.
    ///
    /// Matching is case-insensitive. The empty string is `Some(Unset)`;
    /// anything other than `male`/`female` is `None`.
    ///
    /// ## Examples
    ///
    /// ```
    /// use voice_sensor::types::Gender;
    ///
    /// assert_eq!(Gender::parse_setting("Female"), Some(Gender::Female));
    /// assert_eq!(Gender::parse_setting(""), Some(Gender::Unset));
    /// assert_eq!(Gender::parse_setting("robot"), None);
    /// ```
    pub fn parse_setting(value: &str) -> Option<Gender> {
        match value.to_uppercase().as_str() {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "" => Some(Gender::Unset),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        *self != Gender::Unset
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Unset => "NotSet",
            Gender::Male => "Male",
            Gender::Female => "Female",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Voice Age
// ============================================================================

/// Age category of a voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceAge {
    #[default]
    Unset,
    Child,
    Teen,
    Adult,
    Senior,
}

impl VoiceAge {
    pub fn is_set(&self) -> bool {
        *self != VoiceAge::Unset
    }
}

impl fmt::Display for VoiceAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VoiceAge::Unset => "NotSet",
            VoiceAge::Child => "Child",
            VoiceAge::Teen => "Teen",
            VoiceAge::Adult => "Adult",
            VoiceAge::Senior => "Senior",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Voice Descriptor
// ============================================================================

/// An installed voice, as enumerated by the speech engine.
///
/// Descriptors are read-only to the sensor. Their order in the list returned
/// by [`SpeechEngine::voices`](crate::engine::SpeechEngine::voices) is the
/// index space used by index-based selection.
///
/// ## Examples
///
/// ```
/// use voice_sensor::types::{Gender, VoiceAge, VoiceDescriptor};
///
/// let voice = VoiceDescriptor::new("Microsoft Zira Desktop")
///     .with_gender(Gender::Female)
///     .with_age(VoiceAge::Adult)
///     .with_locale("en-US");
/// assert!(voice.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// Display name, unique per installation.
    pub name: String,
    pub gender: Gender,
    pub age: VoiceAge,
    /// Locale tag (e.g. `en-US`); empty when the engine does not report one.
    pub locale: String,
    pub enabled: bool,
    /// Engine-specific identifier, when it differs from the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VoiceDescriptor {
    /// Create an enabled voice with the given name and no other metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: Gender::Unset,
            age: VoiceAge::Unset,
            locale: String::new(),
            enabled: true,
            identifier: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: VoiceAge) -> Self {
        self.age = age;
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ============================================================================
// Volume / Rate
// ============================================================================

/// Output volume, 0 (silent) to 100 (full).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Volume(u8);

impl Volume {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 100;
    pub const DEFAULT: Volume = Volume(100);

    /// Build a volume from a raw configuration value.
    ///
    /// Out-of-range values reset to the default rather than clamping, so
    /// both `150` and `-5` produce `100`.
    pub fn from_setting(value: i64) -> Volume {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Volume(value as u8)
        } else {
            Self::DEFAULT
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Speaking rate, -10 (slowest) to 10 (fastest), 0 is the engine's normal rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rate(i8);

impl Rate {
    pub const MIN: i64 = -10;
    pub const MAX: i64 = 10;
    pub const DEFAULT: Rate = Rate(0);

    /// Build a rate from a raw configuration value.
    ///
    /// Out-of-range values reset to the default rather than clamping.
    pub fn from_setting(value: i64) -> Rate {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Rate(value as i8)
        } else {
            Self::DEFAULT
        }
    }

    pub fn get(&self) -> i8 {
        self.0
    }
}

// ============================================================================
// Selector
// ============================================================================

/// The name/gender/index combination used to pick one voice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Requested voice name; empty means unset.
    pub name: String,
    pub gender: Gender,
    /// 1-based position; zero or negative means unset.
    pub index: i32,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_index(&self) -> bool {
        self.index > 0
    }
}

// ============================================================================
// Tests
// ============================================================================
