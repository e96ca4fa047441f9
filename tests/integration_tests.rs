//! Integration tests for the WeatherAI CLI
//!
//! Only offline subcommands are exercised here; the forecast path is
//! covered by the mocked end-to-end tests in `assistant_flow.rs`.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Binary with a given config file and no ambient overrides
fn command(config: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_weatherai"));
    command
        .arg("--config")
        .arg(config)
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars().filter(|(key, _)| key.starts_with("WEATHERAI_")) {
        command.env_remove(key);
    }
    command
}

fn weatherai(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    command(&dir.path().join("config.toml"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn weatherai_with_config(toml: &str, args: &[&str]) -> Output {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, toml).expect("Failed to write config");
    command(&config)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help with the explicit flag
#[test]
fn test_cli_help() {
    let output = weatherai(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AI weather assistant"));
    assert!(stdout.contains("forecast"));
    assert!(stdout.contains("prompt"));
}

/// Test prompt subcommand builds a weekly prompt offline
#[test]
fn test_prompt_command_weekly() {
    let output = weatherai(&["prompt", "Tokyo", "--time-frame", "weekly", "--units", "metric"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Provide detailed weather information for **Tokyo**"));
    assert!(stdout.contains("for the upcoming week ("));
    assert!(stdout.contains("Report all temperatures in Celsius."));
}

/// Test brief flag substitutes the detail level
#[test]
fn test_prompt_command_brief() {
    let output = weatherai(&["prompt", "Berlin", "--brief"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Provide brief weather information for **Berlin**, as of now ("));
    assert!(!stdout.contains("Celsius"));
}

/// Test error handling for empty location
#[test]
fn test_prompt_empty_location_error() {
    let output = weatherai(&["prompt", "  "]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Location cannot be empty"));
}

/// Test unknown time frames are rejected by argument parsing
#[test]
fn test_prompt_unknown_time_frame() {
    let output = weatherai(&["prompt", "Tokyo", "--time-frame", "fortnight"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown time frame"));
}

/// Test classify subcommand honours keyword priority
#[test]
fn test_classify_command() {
    let output = weatherai(&["classify", "Cloudy with a chance of rain and sunny breaks"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("🌧️"));
    assert!(stdout.contains("matched \"rain\""));
}

fn classify_stdin(input: &[u8]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let mut child = command(&dir.path().join("config.toml"))
        .arg("classify")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");

    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

/// Test classify reads stdin when no text is given
#[test]
fn test_classify_from_stdin() {
    let output = classify_stdin(b"Mild and pleasant all afternoon");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("🌤️"));
    assert!(stdout.contains("no keyword matched"));
}

/// Test moon subcommand at the reference new moon
#[test]
fn test_moon_command() {
    let output = weatherai(&["moon", "--date", "2000-01-06T18:14:00Z"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("New Moon"));
    assert!(stdout.contains("Illumination: 0.0%"));
}

/// Test forecast without any API key fails before any network call
#[test]
fn test_forecast_without_api_key() {
    let output = weatherai(&["forecast", "Tokyo"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No Gemini API key found"));
}

/// Test forecast requires a location or a favorite
#[test]
fn test_forecast_without_location() {
    let output = weatherai(&["forecast", "--api-key", "test_api_key_123"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid input"));
}

/// Test favorites listing from a custom config file
#[test]
fn test_favorites_from_config() {
    let output = weatherai_with_config(
        "[defaults]\nfavorites = [\"Tokyo\", \"Berlin\"]\n",
        &["favorites"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0: Tokyo"));
    assert!(stdout.contains("1: Berlin"));
}

/// Test invalid UTF-8 on stdin is reported as bad input
#[test]
fn test_classify_rejects_invalid_utf8() {
    let output = classify_stdin(&[0x66, 0x6f, 0xff, 0xfe]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid input: input is not valid UTF-8"));
    assert!(!stderr.contains("File operation failed"));
}

/// Test --detailed overrides a brief default from the config file
#[test]
fn test_detailed_flag_overrides_config() {
    let brief_config = "[defaults]\ndetailed = false\n";

    let output = weatherai_with_config(brief_config, &["prompt", "Oslo"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Provide brief weather information"));

    let output = weatherai_with_config(brief_config, &["prompt", "Oslo", "--detailed"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Provide detailed weather information"));
}

/// Test --brief and --detailed cannot be combined
#[test]
fn test_brief_conflicts_with_detailed() {
    let output = weatherai(&["prompt", "Oslo", "--brief", "--detailed"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"));
}

/// Test favorites are read-only; there is no flag to add one at runtime
#[test]
fn test_forecast_has_no_save_favorite_flag() {
    let output = weatherai(&["forecast", "Tokyo", "--save-favorite"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unexpected argument '--save-favorite'"));
}
