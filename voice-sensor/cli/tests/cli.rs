use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn dry_run() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("voice-sensor");
    cmd.arg("--dry-run").env_remove("RUST_LOG");
    cmd
}

fn measure_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("measures.toml");
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Help Tests
// ============================================================================

#[test]
fn test_help_flag() {
    cargo_bin_cmd!("voice-sensor")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("text-to-speech"))
        .stdout(predicate::str::contains("SELECTION:"));
}

#[test]
fn test_speak_requires_text() {
    dry_run().arg("speak").assert().failure();
}

// ============================================================================
// Voices Tests
// ============================================================================

#[test]
fn test_voices_table() {
    dry_run()
        .arg("voices")
        .assert()
        .success()
        .stdout(predicate::str::contains("INDEX"))
        .stdout(predicate::str::contains("Microsoft David Desktop"))
        .stdout(predicate::str::contains("Microsoft Hazel Desktop"));
}

#[test]
fn test_voices_json() {
    let output = dry_run().args(["voices", "--json"]).output().unwrap();
    assert!(output.status.success());

    let voices: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let voices = voices.as_array().unwrap();
    assert_eq!(voices.len(), 4);
    assert_eq!(voices[1]["name"], "Microsoft Zira Desktop");
    assert_eq!(voices[1]["gender"], "female");
    assert_eq!(voices[1]["locale"], "en-US");
}

// ============================================================================
// Resolve Tests
// ============================================================================

#[test]
fn test_resolve_defaults_to_first_voice() {
    dry_run()
        .arg("resolve")
        .assert()
        .success()
        .stdout("Microsoft David Desktop\n");
}

#[test]
fn test_resolve_second_female() {
    dry_run()
        .args(["resolve", "--gender", "FEMALE", "--index", "2"])
        .assert()
        .success()
        .stdout("Microsoft Hazel Desktop\n");
}

#[test]
fn test_resolve_name_is_case_insensitive() {
    dry_run()
        .args(["resolve", "--name", "microsoft george desktop", "--gender", "female"])
        .assert()
        .success()
        .stdout("Microsoft George Desktop\n");
}

#[test]
fn test_resolve_unknown_name_warns() {
    dry_run()
        .args(["resolve", "--name", "Nonexistent"])
        .assert()
        .success()
        .stdout("<none>\n")
        .stderr(predicate::str::contains(
            "Speech.dll: Invalid Name, Gender and/or Index. Using best matching valid voice.",
        ));
}

#[test]
fn test_resolve_invalid_gender_is_ignored() {
    dry_run()
        .args(["resolve", "--gender", "robot"])
        .assert()
        .success()
        .stdout("Microsoft David Desktop\n")
        .stderr(predicate::str::contains("Speech.dll: Invalid gender"));
}

// ============================================================================
// Speak Tests
// ============================================================================

#[test]
fn test_speak_dry_run() {
    dry_run()
        .args(["-v", "speak", "--gender", "female", "hello", "world"])
        .assert()
        .success()
        .stderr(predicate::str::contains("dry-run speak"))
        .stderr(predicate::str::contains("Microsoft Zira Desktop"))
        .stderr(predicate::str::contains("hello world"));
}

#[test]
fn test_speak_out_of_range_settings_are_accepted() {
    dry_run()
        .args(["speak", "--volume", "150", "--rate", "-15", "--no-wait", "hi"])
        .assert()
        .success();
}

// ============================================================================
// Host Tests
// ============================================================================

#[test]
fn test_host_reports_every_measure() {
    let dir = TempDir::new().unwrap();
    let config = measure_file(
        &dir,
        r#"
[Narrator]
Gender = "female"
Index = 2

[Announcer]
Name = "Microsoft George Desktop"
Volume = 40
"#,
    );

    dry_run()
        .arg("host")
        .arg("--config")
        .arg(&config)
        .args(["--bang", "Narrator=Build finished", "--bang", "announcer=Deploying"])
        .assert()
        .success()
        .stdout(
            "Narrator: update=4 string=Microsoft Hazel Desktop\n\
             Announcer: update=4 string=Microsoft George Desktop\n",
        );
}

#[test]
fn test_host_unmatched_selector_logs_host_warning() {
    let dir = TempDir::new().unwrap();
    let config = measure_file(&dir, "[Narrator]\nName = \"Nobody\"\n");

    dry_run()
        .arg("host")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout("Narrator: update=4 string=<none>\n")
        .stderr(predicate::str::contains(
            "WARN Speech.dll: Invalid Name, Gender and/or Index.",
        ));
}

#[test]
fn test_host_debug_lists_voices() {
    let dir = TempDir::new().unwrap();
    let config = measure_file(&dir, "[Narrator]\nDebug = 1\n");

    dry_run()
        .args(["host", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("NOTE * Speech.dll - installed voices"))
        .stderr(predicate::str::contains("NOTE   Name          : Microsoft Hazel Desktop"));
}

#[test]
fn test_host_without_debug_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let config = measure_file(&dir, "[Narrator]\nGender = \"female\"\n");

    dry_run()
        .args(["host", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("installed voices").not());
}

#[test]
fn test_host_unknown_bang_section() {
    let dir = TempDir::new().unwrap();
    let config = measure_file(&dir, "[Narrator]\n");

    dry_run()
        .arg("host")
        .arg("--config")
        .arg(&config)
        .args(["--bang", "Missing=hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown measure section: Missing"));
}

#[test]
fn test_host_missing_config() {
    dry_run()
        .args(["host", "--config", "/nonexistent/measures.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading measures"));
}
