use crate::error::TrackError;
use crate::merge::Fields;
use crate::scope::Contribution;
use crate::trigger::TrackingTrigger;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Top-level contents of a harness file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Harness {
	/// Scenarios, run in file order.
	#[serde(default, rename = "scenario")]
	pub scenarios: Vec<Scenario>,
}

/// One nested set of scopes, a trigger, and what the checker should see.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Scenario {
	/// Display name. Must be unique within the harness.
	pub name: String,

	/// Scope contributions, outermost first.
	#[serde(default, rename = "level")]
	pub levels: Vec<Contribution>,

	/// The trigger fired at the innermost scope.
	pub trigger: TriggerSpec,

	/// Event the checker expects to receive. When absent the scenario only
	/// has to complete without error.
	pub expect: Option<ExpectedEvent>,
}

/// Declarative trigger description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TriggerSpec {
	#[serde(default)]
	pub event: String,

	pub payload: Option<Fields>,

	/// Deprecated alias of `payload`.
	pub fields: Option<Fields>,

	#[serde(default)]
	pub options: Fields,
}

/// A fully resolved event as seen by a sink.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedEvent {
	pub event: String,

	#[serde(default)]
	pub payload: Fields,

	#[serde(default)]
	pub options: Fields,
}

/// A parsed harness with the path it came from.
#[derive(Debug, Clone)]
pub struct LoadedHarness {
	pub harness: Harness,
	pub path: PathBuf,
}

impl TriggerSpec {
	/// Build the one-shot trigger described by this table.
	pub fn to_trigger(&self) -> TrackingTrigger {
		let mut trigger =
			TrackingTrigger::new(self.event.clone()).with_options(self.options.clone());
		if let Some(ref payload) = self.payload {
			trigger = trigger.with_payload(payload.clone());
		}
		if let Some(ref fields) = self.fields {
			trigger = trigger.with_fields(fields.clone());
		}
		trigger
	}
}

impl Scenario {
	/// Validate that a checker has somewhere to live.
	pub fn validate(&self) -> Result<(), TrackError> {
		if self.name.trim().is_empty() {
			return Err(TrackError::InvalidScenario {
				name: self.name.clone(),
				reason: "name must not be empty".to_string(),
			});
		}

		if self.expect.is_some() && self.levels.is_empty() {
			return Err(TrackError::InvalidScenario {
				name: self.name.clone(),
				reason: "`expect` needs at least one level to install the checker on".to_string(),
			});
		}

		Ok(())
	}
}

impl Harness {
	/// Validate every scenario and reject duplicate names.
	pub fn validate(&self) -> Result<(), TrackError> {
		let mut seen = HashSet::new();
		for scenario in &self.scenarios {
			scenario.validate()?;
			if !seen.insert(scenario.name.as_str()) {
				return Err(TrackError::InvalidScenario {
					name: scenario.name.clone(),
					reason: "duplicate scenario name".to_string(),
				});
			}
		}
		Ok(())
	}

	pub fn scenario(&self, name: &str) -> Result<&Scenario, TrackError> {
		self.scenarios
			.iter()
			.find(|scenario| scenario.name == name)
			.ok_or_else(|| TrackError::ScenarioNotFound {
				name: name.to_string(),
			})
	}
}
