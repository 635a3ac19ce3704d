use voice_sensor::VoiceDescriptor;

/// Shown in place of an empty resolved voice name.
pub const NO_VOICE: &str = "<none>";

pub fn display_name(resolved: &str) -> &str {
    if resolved.is_empty() { NO_VOICE } else { resolved }
}

/// Print voices as a numbered table in engine order.
///
/// The numbers are the 1-based values the `Index` option selects.
pub fn print_table(voices: &[VoiceDescriptor]) {
    if voices.is_empty() {
        println!("No voices installed");
        return;
    }

    let name_width = voices
        .iter()
        .map(|v| v.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    println!(
        "{:>5}  {:<name_width$}  {:<7}  {:<6}  {:<8}  ENABLED",
        "INDEX", "NAME", "GENDER", "AGE", "LOCALE"
    );
    for (i, voice) in voices.iter().enumerate() {
        println!(
            "{:>5}  {:<name_width$}  {:<7}  {:<6}  {:<8}  {}",
            i + 1,
            voice.name,
            voice.gender.to_string(),
            voice.age.to_string(),
            if voice.locale.is_empty() { "-" } else { &voice.locale },
            if voice.enabled { "yes" } else { "no" },
        );
    }
}

pub fn print_json(voices: &[VoiceDescriptor]) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(voices)?);
    Ok(())
}
