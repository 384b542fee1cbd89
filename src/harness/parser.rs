use crate::error::{Result, TrackError};
use crate::harness::types::{Harness, LoadedHarness};
use std::path::Path;

/// Parse a harness file from the given path.
pub fn parse_harness_file(path: &Path) -> Result<Harness> {
	let content = std::fs::read_to_string(path).map_err(|source| TrackError::HarnessReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_harness_str(&content, path)
}

/// Parse a harness file and keep its path for reporting.
pub fn load_harness(path: &Path) -> Result<LoadedHarness> {
	let harness = parse_harness_file(path)?;
	Ok(LoadedHarness {
		harness,
		path: path.to_path_buf(),
	})
}

/// Parse a harness from a string (useful for testing).
pub fn parse_harness_str(content: &str, path: &Path) -> Result<Harness> {
	let harness: Harness =
		toml::from_str(content).map_err(|source| TrackError::HarnessParseError {
			path: path.to_path_buf(),
			source,
		})?;

	harness.validate()?;

	Ok(harness)
}
