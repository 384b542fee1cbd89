use crate::merge::Fields;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type SinkFn = dyn Fn(&str, Fields, Fields) -> Value + Send + Sync;

/// The terminal action that receives a fully resolved event.
///
/// Cloning a sink shares the underlying closure. Two sinks compare equal when
/// they share the same closure, or when both are no-ops.
#[derive(Clone)]
pub struct Sink {
	handler: Arc<SinkFn>,
	noop: bool,
}

impl Sink {
	/// Wrap a closure as a sink.
	pub fn new<F>(handler: F) -> Self
	where
		F: Fn(&str, Fields, Fields) -> Value + Send + Sync + 'static,
	{
		Self {
			handler: Arc::new(handler),
			noop: false,
		}
	}

	/// A sink that ignores every event and returns `Value::Null`.
	pub fn noop() -> Self {
		Self {
			handler: Arc::new(|_, _, _| Value::Null),
			noop: true,
		}
	}

	pub fn is_noop(&self) -> bool {
		self.noop
	}

	/// Hand one resolved event to the sink and return whatever it returns.
	pub fn emit(&self, event: &str, payload: Fields, options: Fields) -> Value {
		(self.handler)(event, payload, options)
	}
}

impl Default for Sink {
	fn default() -> Self {
		Self::noop()
	}
}

impl PartialEq for Sink {
	fn eq(&self, other: &Self) -> bool {
		(self.noop && other.noop) || Arc::ptr_eq(&self.handler, &other.handler)
	}
}

impl fmt::Debug for Sink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Sink").field("noop", &self.noop).finish()
	}
}
