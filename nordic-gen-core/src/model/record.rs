use crate::error::{NameGenError, Result};

/// Separators allowed inside compound given names (`Anna-Liisa`, `Karl Johan`).
const SEPARATORS: [char; 3] = ['-', '\'', ' '];

/// Returns `true` for the letters of the supported alphabet
/// (ASCII Latin letters plus ä, ö and å, any case).
pub fn is_name_letter(c: char) -> bool {
	c.is_ascii_alphabetic() || matches!(c, 'ä' | 'ö' | 'å' | 'Ä' | 'Ö' | 'Å')
}

/// Returns `true` if `text` is a non-empty run of letters only.
///
/// Used for start/end constraints, which may not contain separators.
pub fn is_name_part(text: &str) -> bool {
	!text.is_empty() && text.chars().all(is_name_letter)
}

/// Returns `true` if `name` starts and ends with a letter and never has two
/// separators in a row.
pub fn is_well_formed(name: &str) -> bool {
	let starts_with_letter = name.chars().next().is_some_and(is_name_letter);
	let ends_with_letter = name.chars().last().is_some_and(is_name_letter);
	let mut previous_separator = false;
	for c in name.chars() {
		let separator = SEPARATORS.contains(&c);
		if separator && previous_separator {
			return false;
		}
		previous_separator = separator;
	}
	starts_with_letter && ends_with_letter
}

/// A training name with its prevalence.
///
/// # Invariants
/// - `text` is lowercase, trimmed, with single spaces, and only contains
///   letters of the supported alphabet plus `-`, `'` and space
/// - `text` starts and ends with a letter
/// - `weight >= 1`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrainingRecord {
	text: String,
	weight: u64,
}

impl TrainingRecord {
	/// Validates and normalizes a raw name.
	///
	/// # Errors
	/// Returns `InvalidRecord` if the weight is 0 or the name contains
	/// characters outside the supported alphabet.
	pub fn new(text: &str, weight: u64) -> Result<Self> {
		let invalid = |reason: &str| NameGenError::InvalidRecord {
			text: text.to_owned(),
			reason: reason.to_owned(),
		};

		if weight == 0 {
			return Err(invalid("weight must be >= 1"));
		}

		let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
		if normalized.is_empty() {
			return Err(invalid("empty name"));
		}
		if !normalized.chars().all(|c| is_name_letter(c) || SEPARATORS.contains(&c)) {
			return Err(invalid("unsupported character"));
		}
		if !is_well_formed(&normalized) {
			return Err(invalid("separators must sit between letters"));
		}

		Ok(Self { text: normalized, weight })
	}

	/// Normalized (lowercase) text.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn weight(&self) -> u64 {
		self.weight
	}

	/// Length in characters (never 0).
	pub fn char_count(&self) -> usize {
		self.text.chars().count()
	}
}

/// Capitalizes a lowercase name for display.
///
/// The first letter and every letter following a separator are upper-cased:
/// `anna-liisa` → `Anna-Liisa`.
pub fn capitalize(name: &str) -> String {
	let mut output = String::with_capacity(name.len());
	let mut upper_next = true;
	for c in name.chars() {
		if upper_next {
			output.extend(c.to_uppercase());
		} else {
			output.push(c);
		}
		upper_next = SEPARATORS.contains(&c);
	}
	output
}
