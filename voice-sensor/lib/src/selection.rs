//! Voice selection.
//!
//! Two strategies live here:
//! - [`resolve`] turns a configured [`Selector`] into one concrete installed
//!   voice on every reload
//! - [`best_match`] is the hint-based fallback used at speak time when the
//!   selector resolved to nothing

use crate::types::{Gender, Selector, VoiceAge, VoiceDescriptor};

/// Resolve a selector against the enumerated voices.
///
/// Voices are scanned in enumeration order and the first rule that matches
/// wins:
///
/// 1. Nothing requested (no name, no gender, index <= 0): the first voice.
/// 2. A name is set and equals the voice's name, ignoring case.
/// 3. No name but a gender: voices of another gender are skipped. With a
///    positive index the `index`-th voice of that gender is taken, otherwise
///    the first one.
/// 4. No name and no gender: the `index`-th voice overall.
///
/// The 1-based position counter is shared by rules 3 and 4 and advances on
/// every voice that falls through, including voices scanned while a name was
/// requested but did not match.
///
/// ## Examples
///
/// ```
/// use voice_sensor::selection::resolve;
/// use voice_sensor::types::{Gender, Selector, VoiceDescriptor};
///
/// let voices = vec![
///     VoiceDescriptor::new("David").with_gender(Gender::Male),
///     VoiceDescriptor::new("Zira").with_gender(Gender::Female),
/// ];
///
/// let chosen = resolve(&voices, &Selector::new().with_gender(Gender::Female));
/// assert_eq!(chosen.map(|v| v.name.as_str()), Some("Zira"));
/// ```
pub fn resolve<'a>(voices: &'a [VoiceDescriptor], selector: &Selector) -> Option<&'a VoiceDescriptor> {
    let has_name = selector.has_name();
    let has_gender = selector.gender.is_set();
    let has_index = selector.has_index();
    let index = selector.index;
    let wanted_name = selector.name.to_uppercase();

    let mut position = 1;
    for voice in voices {
        if !has_name && !has_gender && !has_index {
            return Some(voice);
        }

        if has_name && wanted_name == voice.name.to_uppercase() {
            return Some(voice);
        }

        if !has_name && has_gender {
            if voice.gender != selector.gender {
                continue;
            }

            if !has_index {
                return Some(voice);
            }
            if index == position {
                return Some(voice);
            }

            position += 1;
            continue;
        }

        if !has_name && index == position {
            return Some(voice);
        }

        position += 1;
    }

    None
}

/// Pick a voice from hints, the way the engine does when no name is known.
///
/// Candidates are the enabled voices (or every voice when none is enabled),
/// narrowed to the requested gender and then age whenever at least one
/// candidate matches. `alternate` chooses among the remaining candidates,
/// wrapping around; negative values behave like zero.
///
/// Returns `None` only when `voices` is empty.
pub fn best_match(
    voices: &[VoiceDescriptor],
    gender: Gender,
    age: VoiceAge,
    alternate: i32,
) -> Option<&VoiceDescriptor> {
    let mut candidates: Vec<&VoiceDescriptor> = voices.iter().filter(|v| v.enabled).collect();
    if candidates.is_empty() {
        candidates = voices.iter().collect();
    }

    if gender.is_set() {
        narrow(&mut candidates, |v| v.gender == gender);
    }
    if age.is_set() {
        narrow(&mut candidates, |v| v.age == age);
    }

    if candidates.is_empty() {
        return None;
    }

    let slot = alternate.max(0) as usize % candidates.len();
    Some(candidates[slot])
}

/// Keep only matching candidates, unless that would leave none.
fn narrow(candidates: &mut Vec<&VoiceDescriptor>, keep: impl Fn(&VoiceDescriptor) -> bool) {
    if candidates.iter().any(|v| keep(v)) {
        candidates.retain(|v| keep(v));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, gender: Gender) -> VoiceDescriptor {
        VoiceDescriptor::new(name).with_gender(gender)
    }

    /// M F M F M F
    fn mixed() -> Vec<VoiceDescriptor> {
        vec![
            voice("Mark", Gender::Male),
            voice("Zira", Gender::Female),
            voice("David", Gender::Male),
            voice("Hazel", Gender::Female),
            voice("George", Gender::Male),
            voice("Susan", Gender::Female),
        ]
    }

    fn resolved(voices: &[VoiceDescriptor], selector: Selector) -> Option<String> {
        resolve(voices, &selector).map(|v| v.name.clone())
    }

    // ========================================================================
    // Rule 1: nothing requested
    // ========================================================================

    #[test]
    fn test_empty_selector_picks_first_voice() {
        assert_eq!(resolved(&mixed(), Selector::new()), Some("Mark".into()));
    }

    #[test]
    fn test_non_positive_index_is_unset() {
        assert_eq!(resolved(&mixed(), Selector::new().with_index(0)), Some("Mark".into()));
        assert_eq!(resolved(&mixed(), Selector::new().with_index(-3)), Some("Mark".into()));
    }

    #[test]
    fn test_empty_voice_list_resolves_nothing() {
        assert_eq!(resolved(&[], Selector::new()), None);
    }

    // ========================================================================
    // Rule 2: name
    // ========================================================================

    #[test]
    fn test_name_match_ignores_case_and_returns_canonical_name() {
        assert_eq!(resolved(&mixed(), Selector::new().with_name("hAzEl")), Some("Hazel".into()));
    }

    #[test]
    fn test_name_wins_over_gender_and_index() {
        let selector = Selector::new()
            .with_name("DAVID")
            .with_gender(Gender::Female)
            .with_index(1);
        assert_eq!(resolved(&mixed(), selector), Some("David".into()));
    }

    #[test]
    fn test_unknown_name_resolves_nothing() {
        let selector = Selector::new().with_name("Nonexistent").with_index(1);
        assert_eq!(resolved(&mixed(), selector), None);
    }

    // ========================================================================
    // Rule 3: gender
    // ========================================================================

    #[test]
    fn test_gender_without_index_picks_first_of_gender() {
        let selector = Selector::new().with_gender(Gender::Female);
        assert_eq!(resolved(&mixed(), selector), Some("Zira".into()));
    }

    #[test]
    fn test_gender_with_index_counts_only_that_gender() {
        let selector = Selector::new().with_gender(Gender::Female).with_index(2);
        assert_eq!(resolved(&mixed(), selector), Some("Hazel".into()));

        let selector = Selector::new().with_gender(Gender::Male).with_index(3);
        assert_eq!(resolved(&mixed(), selector), Some("George".into()));
    }

    #[test]
    fn test_gender_index_past_end_resolves_nothing() {
        let selector = Selector::new().with_gender(Gender::Female).with_index(4);
        assert_eq!(resolved(&mixed(), selector), None);
    }

    #[test]
    fn test_gender_without_matches_resolves_nothing() {
        let voices = vec![voice("Mark", Gender::Male), voice("David", Gender::Male)];
        let selector = Selector::new().with_gender(Gender::Female);
        assert_eq!(resolved(&voices, selector), None);
    }

    #[test]
    fn test_unset_gender_voices_never_match_a_gender_filter() {
        let voices = vec![voice("Robot", Gender::Unset), voice("Zira", Gender::Female)];
        let selector = Selector::new().with_gender(Gender::Female).with_index(1);
        assert_eq!(resolved(&voices, selector), Some("Zira".into()));
    }

    // ========================================================================
    // Rule 4: index
    // ========================================================================

    #[test]
    fn test_index_counts_every_voice() {
        assert_eq!(resolved(&mixed(), Selector::new().with_index(1)), Some("Mark".into()));
        assert_eq!(resolved(&mixed(), Selector::new().with_index(4)), Some("Hazel".into()));
        assert_eq!(resolved(&mixed(), Selector::new().with_index(6)), Some("Susan".into()));
    }

    #[test]
    fn test_index_past_end_resolves_nothing() {
        assert_eq!(resolved(&mixed(), Selector::new().with_index(7)), None);
    }

    // ========================================================================
    // Best match (hints)
    // ========================================================================

    #[test]
    fn test_best_match_without_hints_uses_alternate() {
        let voices = mixed();
        let pick = |alt| best_match(&voices, Gender::Unset, VoiceAge::Unset, alt).map(|v| v.name.as_str());
        assert_eq!(pick(0), Some("Mark"));
        assert_eq!(pick(1), Some("Zira"));
        assert_eq!(pick(7), Some("Zira"));
        assert_eq!(pick(-2), Some("Mark"));
    }

    #[test]
    fn test_best_match_prefers_gender() {
        let voices = mixed();
        let chosen = best_match(&voices, Gender::Female, VoiceAge::Unset, 2).unwrap();
        assert_eq!(chosen.name, "Susan");
    }

    #[test]
    fn test_best_match_ignores_unsatisfiable_hints() {
        let voices = vec![voice("Mark", Gender::Male)];
        let chosen = best_match(&voices, Gender::Female, VoiceAge::Child, 0).unwrap();
        assert_eq!(chosen.name, "Mark");
    }

    #[test]
    fn test_best_match_narrows_by_age() {
        let voices = vec![
            voice("Zira", Gender::Female).with_age(VoiceAge::Adult),
            voice("Katie", Gender::Female).with_age(VoiceAge::Teen),
        ];
        let chosen = best_match(&voices, Gender::Female, VoiceAge::Teen, 0).unwrap();
        assert_eq!(chosen.name, "Katie");
    }

    #[test]
    fn test_best_match_skips_disabled_voices() {
        let voices = vec![
            voice("Mark", Gender::Male).with_enabled(false),
            voice("David", Gender::Male),
        ];
        let chosen = best_match(&voices, Gender::Male, VoiceAge::Unset, 0).unwrap();
        assert_eq!(chosen.name, "David");
    }

    #[test]
    fn test_best_match_on_empty_list() {
        assert!(best_match(&[], Gender::Male, VoiceAge::Unset, 0).is_none());
    }
}
