//! Nested tracking scopes.
//!
//! This module handles:
//! - Contribution normalization (deprecated field aliases)
//! - Snapshot resolution in merge and overwrite modes
//! - The explicit scope stack and event triggering

pub mod chain;
pub mod contribution;
pub mod sink;
pub mod snapshot;

pub use chain::{Chain, Level, LevelState};
pub use contribution::{Contribution, NormalizedContribution};
pub use sink::Sink;
pub use snapshot::Snapshot;

use crate::error::Result;
use crate::merge::Fields;
use serde_json::Value;

/// Anything that can fire a tracking event.
pub trait Scope {
	fn trigger(
		&self,
		event: Option<&str>,
		payload: Option<&Fields>,
		options: Option<&Fields>,
	) -> Result<Value>;
}

impl Scope for Snapshot {
	fn trigger(
		&self,
		event: Option<&str>,
		payload: Option<&Fields>,
		options: Option<&Fields>,
	) -> Result<Value> {
		Snapshot::trigger(self, event, payload, options)
	}
}

/// An unresolved level has no parent to inherit from yet, so it triggers
/// through the root snapshot and its no-op sink.
impl Scope for Level {
	fn trigger(
		&self,
		event: Option<&str>,
		payload: Option<&Fields>,
		options: Option<&Fields>,
	) -> Result<Value> {
		match self.snapshot() {
			Some(snapshot) => snapshot.trigger(event, payload, options),
			None => Snapshot::root().trigger(event, payload, options),
		}
	}
}

impl Scope for Chain {
	fn trigger(
		&self,
		event: Option<&str>,
		payload: Option<&Fields>,
		options: Option<&Fields>,
	) -> Result<Value> {
		Chain::trigger(self, event, payload, options)
	}
}
