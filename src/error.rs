use std::path::PathBuf;

/// Library-level structured errors for track-chain.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
	#[error("event is a required parameter")]
	MissingEventName,

	#[error("No tracking scope at depth {depth}")]
	LevelNotFound { depth: usize },

	#[error("Failed to read harness file: {path}")]
	HarnessReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse harness file: {path}")]
	HarnessParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid scenario '{name}': {reason}")]
	InvalidScenario { name: String, reason: String },

	#[error("Scenario not found: {name}")]
	ScenarioNotFound { name: String },

	#[error("Invalid assignment '{input}', expected KEY=VALUE")]
	InvalidAssignment { input: String },
}

/// Result type alias using TrackError.
pub type Result<T> = std::result::Result<T, TrackError>;
