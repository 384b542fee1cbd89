//! Scenario harness for tracking scopes.
//!
//! This module handles:
//! - TOML harness file parsing and validation
//! - Building scope chains with a recording checker sink
//! - Running scenarios and reporting outcomes

pub mod parser;
pub mod runner;
pub mod types;

pub use parser::{load_harness, parse_harness_file, parse_harness_str};
pub use runner::{
	HarnessReport, Outcome, Recorder, ScenarioReport, build_chain, echo_sink, fire, run_harness,
	run_scenario,
};
pub use types::{ExpectedEvent, Harness, LoadedHarness, Scenario, TriggerSpec};

use crate::error::{Result, TrackError};
use serde_json::Value;

/// Parse a `KEY=VALUE` assignment.
///
/// The value is read as JSON when it parses as JSON (`3`, `true`, `[1]`,
/// `{"a":1}`), and kept as a plain string otherwise.
pub fn parse_assignment(input: &str) -> Result<(String, Value)> {
	let (key, raw) = input
		.split_once('=')
		.filter(|(key, _)| !key.trim().is_empty())
		.ok_or_else(|| TrackError::InvalidAssignment {
			input: input.to_string(),
		})?;

	let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
	Ok((key.trim().to_string(), value))
}

/// Generate a starter harness file.
pub fn generate_init_template() -> String {
	r#"# track-chain harness
#
# Each [[scenario]] nests its [[scenario.level]] tables outermost first.
# Levels accept: payload, eventPayload, options, eventOptions, event,
# overwrite (and the deprecated fields/eventFields/analytics/eventAnalytics).
# When [scenario.expect] is present a checker sink is installed on the
# outermost level and must receive exactly that event.

[[scenario]]
name = "Nested provider with payload"

[[scenario.level]]
payload = { actionlocation = "top" }

[[scenario.level]]
payload = { eventcategory = "harness" }

[scenario.trigger]
event = "generic.click"

[scenario.expect]
event = "generic.click"
payload = { actionlocation = "top", eventcategory = "harness" }
options = {}

[[scenario]]
name = "Per-event payload and options"

[[scenario.level]]
payload = { actionlocation = "left", eventcategory = "harness" }
eventPayload = { "generic.click" = { eventlabel = "custom" } }
options = { delayProcessing = "200" }
eventOptions = { "generic.click" = { delayProcessing = "100" } }

[scenario.trigger]
event = "generic.click"

[scenario.expect]
event = "generic.click"
payload = { actionlocation = "left", eventcategory = "harness", eventlabel = "custom" }
options = { delayProcessing = "100" }

[[scenario]]
name = "Trigger with no provider should not cause hard failure"

[scenario.trigger]
event = "generic.click"
payload = { actionlocation = "top" }
"#
	.to_string()
}
