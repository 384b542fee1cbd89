use crate::merge::Fields;
use crate::scope::sink::Sink;
use serde::Deserialize;

/// What one tracking scope declares before it is merged with its parent.
///
/// `fields`/`event_fields` and the older `analytics`/`event_analytics` are
/// deprecated spellings of `payload`/`event_payload`. They are folded into the
/// current names by [`Contribution::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
	/// Default payload applied to every event at or below this scope.
	pub payload: Option<Fields>,

	/// Per-event payload, keyed by event name.
	pub event_payload: Option<Fields>,

	/// Deprecated alias of `payload`.
	pub fields: Option<Fields>,

	/// Deprecated alias of `event_payload`.
	pub event_fields: Option<Fields>,

	/// Deprecated alias of `fields`, from before payloads were renamed.
	pub analytics: Option<Fields>,

	/// Deprecated alias of `event_fields`.
	pub event_analytics: Option<Fields>,

	/// Default trigger options.
	pub options: Option<Fields>,

	/// Per-event options, keyed by event name.
	pub event_options: Option<Fields>,

	/// Event name used when a trigger call does not name one.
	pub event: Option<String>,

	/// Replace inherited tables instead of merging into them.
	#[serde(default)]
	pub overwrite: bool,

	/// Terminal action for events fired at or below this scope.
	#[serde(skip)]
	pub sink: Option<Sink>,
}

/// A contribution with deprecated aliases resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedContribution {
	pub payload: Option<Fields>,
	pub event_payload: Option<Fields>,
	pub options: Option<Fields>,
	pub event_options: Option<Fields>,
	pub event: Option<String>,
	pub overwrite: bool,
	pub sink: Option<Sink>,
}

impl Contribution {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_payload(mut self, payload: Fields) -> Self {
		self.payload = Some(payload);
		self
	}

	pub fn with_event_payload(mut self, event_payload: Fields) -> Self {
		self.event_payload = Some(event_payload);
		self
	}

	pub fn with_options(mut self, options: Fields) -> Self {
		self.options = Some(options);
		self
	}

	pub fn with_event_options(mut self, event_options: Fields) -> Self {
		self.event_options = Some(event_options);
		self
	}

	pub fn with_event(mut self, event: impl Into<String>) -> Self {
		self.event = Some(event.into());
		self
	}

	pub fn with_overwrite(mut self, overwrite: bool) -> Self {
		self.overwrite = overwrite;
		self
	}

	pub fn with_sink(mut self, sink: Sink) -> Self {
		self.sink = Some(sink);
		self
	}

	/// Fold deprecated names into the current ones.
	///
	/// A current name wins whenever it is present, even if it is empty; an
	/// alias is only consulted when every newer name is absent.
	pub fn normalize(self) -> NormalizedContribution {
		NormalizedContribution {
			payload: self.payload.or(self.fields).or(self.analytics),
			event_payload: self
				.event_payload
				.or(self.event_fields)
				.or(self.event_analytics),
			options: self.options,
			event_options: self.event_options,
			event: self.event.filter(|event| !event.is_empty()),
			overwrite: self.overwrite,
			sink: self.sink,
		}
	}
}

impl From<Contribution> for NormalizedContribution {
	fn from(contribution: Contribution) -> Self {
		contribution.normalize()
	}
}
