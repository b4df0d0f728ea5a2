use std::collections::BTreeMap;

use rand::Rng;

/// Represents a context of the transition table.
///
/// A `State` corresponds to a fixed context (`key`) and stores every observed
/// transition from this context to the next character, weighted by the
/// prevalence of the training names that produced it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by the accumulated prevalence.
///
/// ## Responsibilities:
/// - Accumulate weighted transitions during training
/// - Sample the next character with probability proportional to its weight
/// - Merge with another state having the same key (parallel training support)
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition weight is strictly positive
///
/// Transitions are kept ordered so a seeded RNG always yields the same draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
	/// Context of the state (may contain START sentinels).
	key: String,
	/// Outgoing transitions indexed by the next character.
	/// Example: { 'e' => 1042, 'a' => 3 }
	transitions: BTreeMap<char, u64>,
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			transitions: BTreeMap::new(),
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Adds `weight` to the transition toward `next_char`.
	///
	/// Weights saturate at `u64::MAX`.
	pub fn add_transition(&mut self, next_char: char, weight: u64) {
		let entry = self.transitions.entry(next_char).or_insert(0);
		*entry = entry.saturating_add(weight);
	}

	/// Accumulated weight of the transition toward `next_char` (0 if unseen).
	pub fn weight(&self, next_char: char) -> u64 {
		self.transitions.get(&next_char).copied().unwrap_or(0)
	}

	/// Sum of every outgoing weight.
	pub fn total(&self) -> u64 {
		self.transitions.values().fold(0u64, |total, weight| total.saturating_add(*weight))
	}

	/// Iterates over `(next_char, weight)` pairs in character order.
	pub fn transitions(&self) -> impl Iterator<Item = (char, u64)> + '_ {
		self.transitions.iter().map(|(c, w)| (*c, *w))
	}

	/// Returns `true` if at least one outcome other than `excluded` exists.
	pub fn has_outcome_besides(&self, excluded: Option<char>) -> bool {
		self.transitions.keys().any(|c| Some(*c) != excluded)
	}

	/// Samples the next character with probability proportional to its weight.
	///
	/// `excluded` removes one outcome from consideration (used to force a
	/// continuation when the name is still too short).
	///
	/// Builds the cumulative weight array, draws once in `[0, total)` and
	/// binary searches the landing bucket.
	///
	/// Returns `None` if no eligible transition remains.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R, excluded: Option<char>) -> Option<char> {
		let mut outcomes = Vec::with_capacity(self.transitions.len());
		let mut cumulative = Vec::with_capacity(self.transitions.len());
		let mut total: u64 = 0;
		for (next_char, weight) in &self.transitions {
			if Some(*next_char) == excluded {
				continue;
			}
			total = total.saturating_add(*weight);
			outcomes.push(*next_char);
			cumulative.push(total);
		}
		if total == 0 {
			return None;
		}

		let r = rng.random_range(0..total);
		let index = cumulative.partition_point(|bound| *bound <= r);
		outcomes.get(index).copied()
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same context (`key`).
	/// Transition weights are summed.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err(format!("Key mismatch: '{}' vs '{}'", self.key, other.key));
		}

		for (next_char, weight) in &other.transitions {
			self.add_transition(*next_char, *weight);
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn transitions_accumulate_weights() {
		let mut state = State::new("em");
		state.add_transition('m', 1000);
		state.add_transition('m', 10);
		state.add_transition('i', 3);
		assert_eq!(state.weight('m'), 1010);
		assert_eq!(state.weight('i'), 3);
		assert_eq!(state.weight('x'), 0);
		assert_eq!(state.total(), 1013);
	}

	#[test]
	fn weighted_draws_follow_the_weights() {
		let mut state = State::new("a");
		state.add_transition('x', 900);
		state.add_transition('y', 100);

		let mut rng = StdRng::seed_from_u64(7);
		let draws = 10_000;
		let hits = (0..draws)
			.filter(|_| state.predict(&mut rng, None) == Some('x'))
			.count();
		let ratio = hits as f64 / draws as f64;
		assert!((ratio - 0.9).abs() < 0.02, "ratio was {ratio}");
	}

	#[test]
	fn excluded_outcome_is_never_drawn() {
		let mut state = State::new("a");
		state.add_transition('$', 1_000_000);
		state.add_transition('b', 1);

		let mut rng = StdRng::seed_from_u64(1);
		for _ in 0..200 {
			assert_eq!(state.predict(&mut rng, Some('$')), Some('b'));
		}
	}

	#[test]
	fn nothing_to_draw_when_only_excluded_outcome_exists() {
		let mut state = State::new("a");
		state.add_transition('$', 5);
		let mut rng = StdRng::seed_from_u64(3);
		assert!(!state.has_outcome_besides(Some('$')));
		assert_eq!(state.predict(&mut rng, Some('$')), None);
		assert_eq!(State::new("b").predict(&mut rng, None), None);
	}

	#[test]
	fn huge_weights_saturate() {
		let mut state = State::new("a");
		state.add_transition('a', u64::MAX);
		state.add_transition('a', 5);
		state.add_transition('$', u64::MAX);
		assert_eq!(state.weight('a'), u64::MAX);
		assert_eq!(state.total(), u64::MAX);

		let mut other = State::new("a");
		other.add_transition('$', 1);
		state.merge(&other).unwrap();
		assert_eq!(state.weight('$'), u64::MAX);

		let mut rng = StdRng::seed_from_u64(11);
		assert!(state.predict(&mut rng, None).is_some());
	}

	#[test]
	fn merge_sums_matching_keys_only() {
		let mut left = State::new("ma");
		left.add_transition('r', 2);
		let mut right = State::new("ma");
		right.add_transition('r', 3);
		right.add_transition('t', 1);

		left.merge(&right).unwrap();
		assert_eq!(left.weight('r'), 5);
		assert_eq!(left.weight('t'), 1);

		assert!(left.merge(&State::new("mi")).is_err());
	}
}
