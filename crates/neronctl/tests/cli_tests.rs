//! CLI integration tests for neronctl
//!
//! Tests the CLI surface:
//! - neronctl --version            embedded version
//! - neronctl classify TEXT        category, rule and mood
//! - neronctl classify --json      machine-readable classification
//! - neronctl say TEXT --mute      one reply, text only
//! - neronctl contact ...          validation and mailto fallback
//! - neronctl config [--path]      effective configuration
//!
//! Every test passes its own config file with zeroed delays so nothing
//! depends on the user's environment or waits on real time.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

const FAST_CONFIG: &str = r#"
seed = 3

[timing]
thinking_ms = 0
click_thinking_min_ms = 0
click_thinking_max_ms = 0
greeting_delay_ms = 0
silent_ms = 0

[decoration]
prefix_chance = 0.0
emoji_chance = 0.0
"#;

fn config_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FAST_CONFIG.as_bytes()).unwrap();
    file
}

fn neronctl(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_neronctl"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("NERON_CONFIG")
        .env_remove("NERON_LOG")
        .env_remove("NERON_EMAILJS_SERVICE")
        .env_remove("NERON_EMAILJS_TEMPLATE")
        .env_remove("NERON_EMAILJS_KEY")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run neronctl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_neronctl"))
        .arg("--version")
        .output()
        .expect("Failed to run neronctl");
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_classify_question() {
    let config = config_file();
    let output = neronctl(config.path(), &["classify", "почему", "небо", "синее?"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("category: questions"), "got: {}", out);
    assert!(out.contains("mood:     curious"), "got: {}", out);
}

#[test]
fn test_classify_json_reports_override() {
    let config = config_file();
    let output = neronctl(config.path(), &["classify", "--json", "Салам, брат"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["override"], "kazakh-greeting");
    assert!(value["category"].is_string());
    assert!(value["mood"].is_string());
}

#[test]
fn test_say_prints_reply() {
    let config = config_file();
    let output = neronctl(config.path(), &["say", "пошути", "--mute"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let out = stdout(&output);
    assert!(out.starts_with("[НейронЭксперт] "), "got: {}", out);
    let reply = out.trim_start_matches("[НейронЭксперт] ").trim();
    assert!(
        neron_shared::phrases::phrases(neron_shared::Category::Humor).contains(&reply),
        "unexpected reply: {}",
        reply
    );
}

#[test]
fn test_contact_invalid_email_fails() {
    let config = config_file();
    let output = neronctl(
        config.path(),
        &["contact", "--email", "nobody", "--message", "нужен сайт"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not an email address"));
}

#[test]
fn test_contact_unconfigured_falls_back_to_mailto() {
    let config = config_file();
    let output = neronctl(
        config.path(),
        &["contact", "--email", "a@b.kz", "--message", "нужен сайт"],
    );
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("mailto:djarikdevo%40tutamail.com?subject="), "got: {}", out);
}

#[test]
fn test_config_path_and_dump() {
    let config = config_file();
    let output = neronctl(config.path(), &["config", "--path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), config.path().display().to_string());

    let output = neronctl(config.path(), &["config"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("seed = 3"));
    assert!(out.contains("[timing]"));
    assert!(out.contains("thinking_ms = 0"));
}

#[test]
fn test_bad_config_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"[timing\nthinking_ms = ").unwrap();
    let output = neronctl(file.path(), &["classify", "привет"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse"));
}
