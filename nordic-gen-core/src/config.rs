use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NameGenError, Result};
use crate::model::constraints::GenConstraints;
use crate::model::generator::DEFAULT_MAX_ATTEMPTS;

/// Generation settings shared by the command line and the server.
///
/// Every field has a default, so a configuration file only needs the
/// values it changes:
///
/// ```toml
/// order = 3
/// max_length = 9
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
	/// Context length of the trained table.
	pub order: usize,

	/// Names per run.
	pub count: usize,

	pub min_length: usize,
	pub max_length: usize,

	/// Attempts per name before giving up.
	pub max_attempts: usize,

	/// Spread a batch over all CPU cores.
	pub parallel: bool,

	/// Directory holding the `<language>_<gender>.csv` files.
	pub names_dir: PathBuf,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			order: 2,
			count: 10,
			min_length: 3,
			max_length: 12,
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			parallel: false,
			names_dir: PathBuf::from("names"),
		}
	}
}

impl GenerationConfig {
	/// Parses a TOML document.
	///
	/// # Errors
	/// Returns `Config` on malformed TOML or unexpected value types.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		toml::from_str(text).map_err(|e| NameGenError::Config(e.to_string()))
	}

	/// Reads and parses a TOML file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let text = std::fs::read_to_string(&path)?;
		Self::from_toml_str(&text)
	}

	/// Length bounds as generation constraints (no prefix/suffix).
	pub fn constraints(&self) -> GenConstraints {
		GenConstraints::new(self.min_length, self.max_length)
	}
}
