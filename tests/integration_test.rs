#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn track_cmd() -> assert_cmd::Command {
	assert_cmd::Command::cargo_bin("track-chain").unwrap()
}

fn write_harness(dir: &Path, content: &str) -> std::path::PathBuf {
	let path = dir.join("harness.toml");
	fs::write(&path, content).unwrap();
	path
}

const PASSING_HARNESS: &str = r#"
[[scenario]]
name = "Nested Provider with payload"

[[scenario.level]]
payload = { actionlocation = "top" }

[[scenario.level]]
payload = { eventcategory = "harness" }

[scenario.trigger]
event = "generic.click"

[scenario.expect]
event = "generic.click"
payload = { actionlocation = "top", eventcategory = "harness" }
"#;

const FAILING_HARNESS: &str = r#"
[[scenario]]
name = "Wrong label"

[[scenario.level]]
payload = { eventlabel = "skip" }

[scenario.trigger]
event = "generic.click"

[scenario.expect]
event = "generic.click"
payload = { eventlabel = "custom" }
"#;

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	track_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("nested event-tracking scopes"));
}

#[test]
fn test_version_flag() {
	track_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("track-chain"));
}

#[test]
fn test_no_args_shows_help() {
	track_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_harness() {
	let temp_dir = tempfile::tempdir().unwrap();
	let harness_path = temp_dir.path().join("track-chain.toml");

	track_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created track-chain.toml"));

	let content = fs::read_to_string(&harness_path).unwrap();
	assert!(content.contains("[[scenario]]"));
	assert!(content.contains("[[scenario.level]]"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("track-chain.toml"), "# existing").unwrap();

	track_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites_and_checks_clean() {
	let temp_dir = tempfile::tempdir().unwrap();
	let harness_path = temp_dir.path().join("track-chain.toml");
	fs::write(&harness_path, "# existing").unwrap();

	track_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	track_cmd()
		.arg("check")
		.arg(&harness_path)
		.assert()
		.success()
		.stdout(predicate::str::contains("3 passed, 0 failed"));
}

// ============================================================================
// check tests
// ============================================================================

#[test]
fn test_check_passing_harness() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(temp_dir.path(), PASSING_HARNESS);

	track_cmd()
		.arg("check")
		.arg(&path)
		.assert()
		.success()
		.stdout(predicate::str::contains("PASS  Nested Provider with payload"))
		.stdout(predicate::str::contains("1 passed, 0 failed"));
}

#[test]
fn test_check_failing_harness() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(temp_dir.path(), FAILING_HARNESS);

	track_cmd()
		.arg("check")
		.arg(&path)
		.assert()
		.failure()
		.stdout(predicate::str::contains("FAIL  Wrong label"))
		.stdout(predicate::str::contains("\"eventlabel\":\"skip\""))
		.stdout(predicate::str::contains("0 passed, 1 failed"));
}

#[test]
fn test_check_missing_file() {
	track_cmd()
		.args(["check", "/nonexistent/harness.toml"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to load harness"));
}

#[test]
fn test_check_invalid_harness() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(temp_dir.path(), "[[scenario]\nname = ");

	track_cmd()
		.arg("check")
		.arg(&path)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to parse harness file"));
}

// ============================================================================
// show tests
// ============================================================================

#[test]
fn test_show_prints_each_level() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(temp_dir.path(), PASSING_HARNESS);

	track_cmd()
		.arg("show")
		.arg(&path)
		.assert()
		.success()
		.stdout(predicate::str::contains("# Scenario: Nested Provider with payload"))
		.stdout(predicate::str::contains("## Level 0 (merge)"))
		.stdout(predicate::str::contains("## Level 1 (merge)"))
		.stdout(predicate::str::contains("\"eventcategory\": \"harness\""));
}

#[test]
fn test_show_unknown_scenario() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(temp_dir.path(), PASSING_HARNESS);

	track_cmd()
		.arg("show")
		.arg(&path)
		.args(["--scenario", "missing"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Scenario not found: missing"));
}

// ============================================================================
// trigger tests
// ============================================================================

#[test]
fn test_trigger_with_overrides() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(temp_dir.path(), PASSING_HARNESS);

	let output = track_cmd()
		.arg("trigger")
		.arg(&path)
		.args([
			"--scenario",
			"Nested Provider with payload",
			"--event",
			"page.view",
			"--payload",
			"actionlocation=bottom",
			"--option",
			"delayProcessing=300",
		])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let resolved: serde_json::Value = serde_json::from_slice(&output).unwrap();
	assert_eq!(
		resolved,
		serde_json::json!({
			"event": "page.view",
			"payload": {"actionlocation": "bottom", "eventcategory": "harness"},
			"options": {"delayProcessing": 300}
		})
	);
}

#[test]
fn test_trigger_without_levels_prints_event() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(
		temp_dir.path(),
		r#"
[[scenario]]
name = "No provider"

[scenario.trigger]
event = "generic.click"
payload = { actionlocation = "top" }
"#,
	);

	let output = track_cmd()
		.arg("trigger")
		.arg(&path)
		.args([
			"--scenario",
			"No provider",
			"--payload",
			"eventlabel=custom",
			"--option",
			"delayProcessing=200",
		])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let resolved: serde_json::Value = serde_json::from_slice(&output).unwrap();
	assert_eq!(
		resolved,
		serde_json::json!({
			"event": "generic.click",
			"payload": {"actionlocation": "top", "eventlabel": "custom"},
			"options": {"delayProcessing": 200}
		})
	);
}

#[test]
fn test_trigger_invalid_assignment() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_harness(temp_dir.path(), PASSING_HARNESS);

	track_cmd()
		.arg("trigger")
		.arg(&path)
		.args([
			"--scenario",
			"Nested Provider with payload",
			"--payload",
			"novalue",
		])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid --payload"));
}
