//! Error types shared by the trainer, the generator and the corpus loader.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single generation attempt was thrown away.
///
/// Carried by [`NameGenError::GenerationExhausted`] so callers can tell which
/// constraint could not be met within the retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
	/// The candidate does not start with the requested prefix.
	#[error("name does not start with '{0}'")]
	MissingPrefix(String),
	/// The candidate does not end with the requested suffix.
	#[error("name does not end with '{0}'")]
	MissingSuffix(String),
	/// The candidate is part of the exclusion set.
	#[error("'{0}' already exists in the training data")]
	Duplicate(String),
	/// The walk stopped on a separator or chained two separators.
	#[error("'{0}' is not a well-formed name")]
	Malformed(String),
	/// No distribution was found, even after falling back to the unigram level.
	#[error("no transition found for context '{0}'")]
	SparseTable(String),
}

/// Error type for every fallible operation of the crate.
#[derive(Debug, Error)]
pub enum NameGenError {
	/// No usable training record for the requested selection.
	#[error("no training data available")]
	EmptyCorpus,

	/// Order 0, or a generation order above the order of the table.
	#[error("invalid order: {0}")]
	InvalidOrder(usize),

	/// Training record failing alphabet or weight validation.
	#[error("invalid training record '{text}': {reason}")]
	InvalidRecord { text: String, reason: String },

	/// Generation constraints that can never be satisfied.
	#[error("invalid constraint: {0}")]
	InvalidConstraint(String),

	/// Retry budget spent without producing an acceptable name.
	#[error("generation exhausted after {attempts} attempts: {reason}")]
	GenerationExhausted { attempts: usize, reason: Rejection },

	/// Malformed row in a corpus file.
	#[error("{}:{line}: {reason}", path.display())]
	Corpus { path: PathBuf, line: usize, reason: String },

	/// Partial tables that cannot be combined.
	#[error("merge failed: {0}")]
	Merge(String),

	/// Unreadable configuration.
	#[error("configuration error: {0}")]
	Config(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NameGenError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exhausted_error_reports_the_unmet_constraint() {
		let error = NameGenError::GenerationExhausted {
			attempts: 500,
			reason: Rejection::MissingSuffix("xq".to_owned()),
		};
		assert_eq!(
			error.to_string(),
			"generation exhausted after 500 attempts: name does not end with 'xq'"
		);
	}

	#[test]
	fn rejections_name_the_candidate() {
		assert_eq!(Rejection::Duplicate("Emma".to_owned()).to_string(), "'Emma' already exists in the training data");
		assert_eq!(Rejection::SparseTable("zq".to_owned()).to_string(), "no transition found for context 'zq'");
	}

	#[test]
	fn corpus_error_points_at_the_line() {
		let error = NameGenError::Corpus {
			path: PathBuf::from("names/finnish_male.csv"),
			line: 12,
			reason: "missing prevalence".to_owned(),
		};
		assert_eq!(error.to_string(), "names/finnish_male.csv:12: missing prevalence");
	}

	#[test]
	fn io_errors_convert() {
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
		let error: NameGenError = io.into();
		assert!(matches!(error, NameGenError::Io(_)));
	}
}
