use crate::error::{Result, TrackError};
use crate::merge::{Fields, deep_merge, merge_fields};
use crate::scope::contribution::NormalizedContribution;
use crate::scope::sink::Sink;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

/// The fully resolved configuration visible at one scope.
///
/// Snapshots are immutable: resolving a scope again builds a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
	payload: Fields,
	event_payload: Fields,
	options: Fields,
	event_options: Fields,
	#[serde(skip_serializing_if = "Option::is_none")]
	event: Option<String>,
	#[serde(skip)]
	sink: Sink,
}

impl Snapshot {
	/// The empty snapshot seen by a scope with no parent.
	pub fn root() -> Self {
		Self::default()
	}

	/// Resolve a scope from its parent's snapshot and its own contribution.
	///
	/// In overwrite mode each table is taken from the contribution when
	/// present and from the parent otherwise, independently per table. In
	/// merge mode every table is deep-merged with the contribution on top.
	/// The sink and default event are always "own, else inherited".
	pub fn resolve(parent: &Snapshot, own: &NormalizedContribution) -> Snapshot {
		let (payload, event_payload, options, event_options) = if own.overwrite {
			(
				pick(own.payload.as_ref(), &parent.payload),
				pick(own.event_payload.as_ref(), &parent.event_payload),
				pick(own.options.as_ref(), &parent.options),
				pick(own.event_options.as_ref(), &parent.event_options),
			)
		} else {
			(
				merge_fields(&[Some(&parent.payload), own.payload.as_ref()]),
				merge_fields(&[Some(&parent.event_payload), own.event_payload.as_ref()]),
				merge_fields(&[Some(&parent.options), own.options.as_ref()]),
				merge_fields(&[Some(&parent.event_options), own.event_options.as_ref()]),
			)
		};

		let sink = own.sink.as_ref().unwrap_or(&parent.sink).clone();
		debug!(
			overwrite = own.overwrite,
			own_sink = own.sink.is_some(),
			noop_sink = sink.is_noop(),
			"resolved tracking scope"
		);

		Snapshot {
			payload,
			event_payload,
			options,
			event_options,
			event: own.event.clone().or_else(|| parent.event.clone()),
			sink,
		}
	}

	pub fn payload(&self) -> &Fields {
		&self.payload
	}

	pub fn event_payload(&self) -> &Fields {
		&self.event_payload
	}

	pub fn options(&self) -> &Fields {
		&self.options
	}

	pub fn event_options(&self) -> &Fields {
		&self.event_options
	}

	/// Event name used when a trigger call does not supply one.
	pub fn default_event(&self) -> Option<&str> {
		self.event.as_deref()
	}

	pub fn sink(&self) -> &Sink {
		&self.sink
	}

	/// Merge defaults, per-event values and call-time values, then hand the
	/// result to the sink exactly once.
	///
	/// Precedence, lowest first: scope defaults, the scope's per-event entry
	/// for this event, call-time arguments. An empty or absent `event` falls
	/// back to the scope's default event.
	pub fn trigger(
		&self,
		event: Option<&str>,
		payload: Option<&Fields>,
		options: Option<&Fields>,
	) -> Result<Value> {
		let name = event
			.filter(|name| !name.is_empty())
			.or(self.default_event())
			.ok_or(TrackError::MissingEventName)?;

		let payload = merge_for_event(&self.payload, &self.event_payload, name, payload);
		let options = merge_for_event(&self.options, &self.event_options, name, options);

		trace!(event = name, noop_sink = self.sink.is_noop(), "triggering event");
		Ok(self.sink.emit(name, payload, options))
	}
}

fn pick(own: Option<&Fields>, inherited: &Fields) -> Fields {
	own.unwrap_or(inherited).clone()
}

// The per-event entry goes through `deep_merge` as-is, so an array entry
// contributes index keys and a scalar entry contributes nothing.
fn merge_for_event(
	defaults: &Fields,
	per_event: &Fields,
	event: &str,
	call: Option<&Fields>,
) -> Fields {
	let defaults = Value::Object(defaults.clone());
	let call = call.cloned().map_or(Value::Null, Value::Object);
	let entry = per_event.get(event).unwrap_or(&Value::Null);
	deep_merge([&defaults, entry, &call])
}
