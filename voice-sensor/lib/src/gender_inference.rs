//! Gender inference from voice names.
//!
//! Some speech backends enumerate voices without gender metadata. Gender-based
//! selection would then never match, so the native engine falls back to
//! guessing a gender from the voice's name with the `gender_guesser` crate.
//!
//! Installed voice names usually carry a vendor prefix and a flavor suffix
//! ("Microsoft David Desktop"), so every word is tried in turn and the first
//! decisive answer wins.

use gender_guesser::{Detector, Gender as GuesserGender};

use crate::types::Gender;

/// Infer gender from a voice name.
///
/// ## Mapping
///
/// | gender_guesser result | Mapped to |
/// |----------------------|-----------|
/// | `Male`, `MayBeMale` | `Gender::Male` |
/// | `Female`, `MayBeFemale` | `Gender::Female` |
/// | `BothMaleFemale`, `NotSure`, `NotFound` | next word, else `Gender::Unset` |
///
/// ## Examples
///
/// ```
/// use voice_sensor::gender_inference::infer_gender;
/// use voice_sensor::types::Gender;
///
/// assert_eq!(infer_gender("Microsoft David Desktop"), Gender::Male);
/// assert_eq!(infer_gender("Samantha"), Gender::Female);
/// assert_eq!(infer_gender(""), Gender::Unset);
/// ```
pub fn infer_gender(name: &str) -> Gender {
    let detector = Detector::new();

    for word in name.split_whitespace() {
        let cleaned: String = word.chars().filter(|c| c.is_alphabetic()).collect();
        if cleaned.is_empty() {
            continue;
        }

        match detector.get_gender(&cleaned) {
            GuesserGender::Male | GuesserGender::MayBeMale => return Gender::Male,
            GuesserGender::Female | GuesserGender::MayBeFemale => return Gender::Female,
            GuesserGender::BothMaleFemale | GuesserGender::NotSure | GuesserGender::NotFound => {}
        }
    }

    Gender::Unset
}
