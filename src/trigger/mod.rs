//! Declarative one-shot triggers.
//!
//! A [`TrackingTrigger`] describes a single event. Activating it fires the
//! event through the nearest enclosing scope and then reports the sink's
//! return value to an optional completion callback.

use crate::error::Result;
use crate::merge::Fields;
use crate::scope::{Scope, Snapshot};
use serde_json::Value;
use std::fmt;
use tracing::trace;

type Callback = Box<dyn FnOnce(&Value)>;

/// A terminal trigger that fires exactly once when activated.
pub struct TrackingTrigger {
	event: String,
	payload: Option<Fields>,
	fields: Option<Fields>,
	options: Fields,
	on_trigger: Option<Callback>,
}

impl TrackingTrigger {
	pub fn new(event: impl Into<String>) -> Self {
		Self {
			event: event.into(),
			payload: None,
			fields: None,
			options: Fields::new(),
			on_trigger: None,
		}
	}

	pub fn with_payload(mut self, payload: Fields) -> Self {
		self.payload = Some(payload);
		self
	}

	/// Deprecated spelling of [`with_payload`](Self::with_payload). An
	/// explicit payload takes precedence.
	pub fn with_fields(mut self, fields: Fields) -> Self {
		self.fields = Some(fields);
		self
	}

	pub fn with_options(mut self, options: Fields) -> Self {
		self.options = options;
		self
	}

	/// Called with the sink's return value after the event fires.
	pub fn on_trigger<F>(mut self, callback: F) -> Self
	where
		F: FnOnce(&Value) + 'static,
	{
		self.on_trigger = Some(Box::new(callback));
		self
	}

	pub fn event(&self) -> &str {
		&self.event
	}

	/// Fire the event through `scope`, or through the root snapshot's no-op
	/// sink when there is no enclosing scope.
	///
	/// Consumes the trigger, so each trigger fires at most once. The
	/// completion callback is not called if the trigger fails.
	pub fn activate<S>(self, scope: Option<&S>) -> Result<Value>
	where
		S: Scope + ?Sized,
	{
		let TrackingTrigger {
			event,
			payload,
			fields,
			options,
			on_trigger,
		} = self;
		let payload = payload.or(fields).unwrap_or_default();

		let result = match scope {
			Some(scope) => scope.trigger(Some(&event), Some(&payload), Some(&options))?,
			None => {
				trace!(event = %event, "no enclosing tracking scope");
				Snapshot::root().trigger(Some(&event), Some(&payload), Some(&options))?
			}
		};

		if let Some(callback) = on_trigger {
			callback(&result);
		}
		Ok(result)
	}
}

impl fmt::Debug for TrackingTrigger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TrackingTrigger")
			.field("event", &self.event)
			.field("payload", &self.payload)
			.field("fields", &self.fields)
			.field("options", &self.options)
			.field("on_trigger", &self.on_trigger.is_some())
			.finish()
	}
}
