use super::state::State;
use std::collections::HashMap;

/// All contexts of one fixed length of the transition table.
///
/// A `ContextModel` of length `k` maps every observed `k`-character context
/// to its [`State`]. The table keeps one of these per back-off level, from
/// the full order down to the empty (unigram) context.
///
/// # Responsibilities
/// - Accumulate weighted transitions for contexts of length `k`
/// - Look up the distribution of a context
/// - Merge with another model of the same length
///
/// # Invariants
/// - Every key in `states` is exactly `k` characters long
/// - Every state holds at least one transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextModel {
	/// Context length of this level.
	k: usize,

	/// Mapping from a context to its corresponding state.
	states: HashMap<String, State>,
}

impl ContextModel {
	/// Creates an empty model for contexts of length `k`.
	pub fn new(k: usize) -> Self {
		Self { k, states: HashMap::new() }
	}

	pub fn context_len(&self) -> usize {
		self.k
	}

	/// Number of distinct contexts seen.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Adds `weight` to the transition `context → next_char`.
	///
	/// `context` must be `k` characters long.
	pub fn add_transition(&mut self, context: &str, next_char: char, weight: u64) {
		debug_assert_eq!(context.chars().count(), self.k);
		self.states
			.entry(context.to_owned())
			.or_insert_with(|| State::new(context))
			.add_transition(next_char, weight);
	}

	/// Returns the state of `context`, if it was ever observed.
	pub fn get(&self, context: &str) -> Option<&State> {
		self.states.get(context)
	}

	/// Iterates over the observed contexts.
	pub fn contexts(&self) -> impl Iterator<Item = &str> {
		self.states.keys().map(String::as_str)
	}

	/// Merges another model of the same context length into this one.
	///
	/// # Errors
	/// Returns an error if the context lengths do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.k != other.k {
			return Err(format!("Context length mismatch: {} vs {}", self.k, other.k));
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}
