use crate::error::Result;
use crate::harness::types::{ExpectedEvent, Harness, Scenario};
use crate::scope::{Chain, Contribution, Sink};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Result of running one scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	Passed,
	Failed { expected: Value, actual: Value },
	Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
	pub name: String,
	pub outcome: Outcome,
}

/// Reports for every scenario in a harness, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarnessReport {
	pub scenarios: Vec<ScenarioReport>,
}

impl HarnessReport {
	pub fn passed(&self) -> usize {
		self.scenarios
			.iter()
			.filter(|report| report.outcome == Outcome::Passed)
			.count()
	}

	pub fn failed(&self) -> usize {
		self.scenarios.len() - self.passed()
	}

	pub fn all_passed(&self) -> bool {
		self.failed() == 0
	}
}

/// Records every event a sink receives.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
	events: Arc<Mutex<Vec<ExpectedEvent>>>,
}

impl Recorder {
	/// A sink that records each event and returns it as JSON.
	pub fn sink(&self) -> Sink {
		let events = Arc::clone(&self.events);
		Sink::new(move |event, payload, options| {
			let recorded = ExpectedEvent {
				event: event.to_string(),
				payload,
				options,
			};
			let value = event_to_value(&recorded);
			events
				.lock()
				.unwrap_or_else(PoisonError::into_inner)
				.push(recorded);
			value
		})
	}

	pub fn events(&self) -> Vec<ExpectedEvent> {
		self.events
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}
}

/// A sink that returns the resolved event as JSON without recording it.
pub fn echo_sink() -> Sink {
	Sink::new(|event, payload, options| {
		event_to_value(&ExpectedEvent {
			event: event.to_string(),
			payload,
			options,
		})
	})
}

fn event_to_value(event: &ExpectedEvent) -> Value {
	serde_json::json!({
		"event": event.event,
		"payload": event.payload,
		"options": event.options,
	})
}

/// Assemble a scenario's scopes, installing `sink` on the outermost level.
///
/// A scenario without levels gets a single empty level carrying `sink`, so
/// the sink still sees the event.
pub fn build_chain(scenario: &Scenario, sink: Option<Sink>) -> Chain {
	let mut contributions = scenario.levels.clone();
	match (sink, contributions.first_mut()) {
		(Some(sink), Some(outermost)) => outermost.sink = Some(sink),
		(Some(sink), None) => contributions.push(Contribution::new().with_sink(sink)),
		(None, _) => {}
	}
	Chain::from_contributions(contributions)
}

/// Fire a scenario's trigger through its scopes with `sink` installed and
/// return the sink's result.
pub fn fire(scenario: &Scenario, sink: Option<Sink>) -> Result<Value> {
	let chain = build_chain(scenario, sink);
	let scope = (!chain.is_empty()).then_some(&chain);
	scenario.trigger.to_trigger().activate(scope)
}

/// Run one scenario and compare what the checker saw with its expectation.
pub fn run_scenario(scenario: &Scenario) -> ScenarioReport {
	let recorder = Recorder::default();
	let sink = scenario.expect.as_ref().map(|_| recorder.sink());

	let outcome = match fire(scenario, sink) {
		Err(e) => Outcome::Errored(e.to_string()),
		Ok(_) => match scenario.expect {
			None => Outcome::Passed,
			Some(ref expected) => compare(expected, &recorder.events()),
		},
	};

	match outcome {
		Outcome::Passed => debug!(scenario = %scenario.name, "scenario passed"),
		ref failure => {
			warn!(scenario = %scenario.name, outcome = ?failure, "scenario did not pass")
		}
	}

	ScenarioReport {
		name: scenario.name.clone(),
		outcome,
	}
}

fn compare(expected: &ExpectedEvent, recorded: &[ExpectedEvent]) -> Outcome {
	match recorded {
		[actual] if actual == expected => Outcome::Passed,
		[actual] => Outcome::Failed {
			expected: event_to_value(expected),
			actual: event_to_value(actual),
		},
		_ => Outcome::Failed {
			expected: event_to_value(expected),
			actual: Value::Array(recorded.iter().map(event_to_value).collect()),
		},
	}
}

/// Run every scenario in order.
pub fn run_harness(harness: &Harness) -> HarnessReport {
	HarnessReport {
		scenarios: harness.scenarios.iter().map(run_scenario).collect(),
	}
}
