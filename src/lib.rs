//! Track-chain - declarative event-tracking scopes.
//!
//! This library provides the core functionality for track-chain, including:
//! - Structural deep merge of payloads and options
//! - Nested tracking scopes resolved in merge or overwrite mode
//! - One-shot declarative triggers that fire through the nearest scope
//! - A TOML scenario harness for checking resolved events
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value};
//! use track_chain::scope::{Chain, Contribution, Sink};
//!
//! fn fields(value: Value) -> track_chain::Fields {
//!     value.as_object().cloned().unwrap_or_default()
//! }
//!
//! let mut chain = Chain::new();
//! chain.push(
//!     Contribution::new()
//!         .with_payload(fields(json!({"actionlocation": "left"})))
//!         .with_sink(Sink::new(|_, payload, _| Value::Object(payload))),
//! );
//! chain.push(Contribution::new().with_payload(fields(json!({"eventcategory": "harness"}))));
//!
//! let sent = chain.trigger(Some("generic.click"), None, None).unwrap();
//! assert_eq!(sent, json!({"actionlocation": "left", "eventcategory": "harness"}));
//! ```

pub mod error;
pub mod harness;
pub mod merge;
pub mod scope;
pub mod trigger;

pub use error::{Result, TrackError};
pub use merge::{Fields, deep_merge, merge_fields};
pub use scope::{Chain, Contribution, Level, LevelState, Scope, Sink, Snapshot};
pub use trigger::TrackingTrigger;
