use super::record::is_name_part;
use crate::error::{NameGenError, Result};

/// Constraints every generated name must satisfy.
///
/// # Responsibilities
/// - Hold the length bounds and the optional prefix/suffix
/// - Normalize prefix/suffix (trimmed, lowercase)
/// - Reject combinations that can never be satisfied
///
/// # Invariants (after [`GenConstraints::validate`])
/// - `1 <= min_length <= max_length`
/// - `starts_with` / `ends_with` are letters only and fit in `max_length`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenConstraints {
	/// Minimum length in characters.
	pub min_length: usize,

	/// Maximum length in characters.
	pub max_length: usize,

	starts_with: Option<String>,
	ends_with: Option<String>,
}

impl Default for GenConstraints {
	fn default() -> Self {
		Self { min_length: 3, max_length: 12, starts_with: None, ends_with: None }
	}
}

impl GenConstraints {
	/// Creates constraints with the given length bounds and no prefix/suffix.
	pub fn new(min_length: usize, max_length: usize) -> Self {
		Self { min_length, max_length, ..Self::default() }
	}

	/// Requires names to start with `prefix`. Empty input clears the constraint.
	pub fn starting_with(mut self, prefix: &str) -> Self {
		self.starts_with = Self::normalize(prefix);
		self
	}

	/// Requires names to end with `suffix`. Empty input clears the constraint.
	pub fn ending_with(mut self, suffix: &str) -> Self {
		self.ends_with = Self::normalize(suffix);
		self
	}

	fn normalize(part: &str) -> Option<String> {
		let part = part.trim().to_lowercase();
		if part.is_empty() { None } else { Some(part) }
	}

	pub fn starts_with(&self) -> Option<&str> {
		self.starts_with.as_deref()
	}

	pub fn ends_with(&self) -> Option<&str> {
		self.ends_with.as_deref()
	}

	/// Checks that the constraints can be satisfied at all.
	///
	/// # Errors
	/// Returns `InvalidConstraint` describing the first problem found.
	pub fn validate(&self) -> Result<()> {
		let invalid = |msg: String| Err(NameGenError::InvalidConstraint(msg));

		if self.min_length == 0 {
			return invalid("minimum length must be >= 1".to_owned());
		}
		if self.min_length > self.max_length {
			return invalid(format!(
				"minimum length {} exceeds maximum length {}",
				self.min_length, self.max_length
			));
		}
		for (label, part) in [("starting", &self.starts_with), ("ending", &self.ends_with)] {
			let Some(part) = part else { continue };
			if !is_name_part(part) {
				return invalid(format!("{label} string '{part}' must contain only letters"));
			}
			if part.chars().count() > self.max_length {
				return invalid(format!(
					"{label} string '{part}' is longer than the maximum length {}",
					self.max_length
				));
			}
		}
		Ok(())
	}
}
