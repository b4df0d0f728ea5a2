use std::collections::HashSet;
use std::thread;

use rand::Rng;

use super::constraints::GenConstraints;
use super::record::{capitalize, is_well_formed};
use super::retry::{Exhausted, retry};
use super::table::{END_CHAR, START_CHAR, TransitionTable};
use crate::error::{NameGenError, Rejection, Result};

/// Default number of attempts per name before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Names produced by a batch, plus the errors that cut it short.
#[derive(Debug, Default)]
pub struct Batch {
	/// Distinct capitalized names, in generation order.
	pub names: Vec<String>,

	/// Per-name failures (typically `GenerationExhausted`).
	pub failures: Vec<NameGenError>,
}

/// Draws names from a [`TransitionTable`].
///
/// # Responsibilities
/// - Walk the table from the START context with weighted draws
/// - Fall back to shorter contexts when a context was never seen
/// - Enforce length bounds, prefix, suffix and duplicate avoidance
/// - Retry rejected candidates within a bounded budget
///
/// The table is borrowed immutably, so one table can feed any number of
/// generators, including from several threads.
#[derive(Debug, Clone)]
pub struct Generator<'a> {
	table: &'a TransitionTable,

	/// Lookback used while walking, `1..=table.order()`.
	order: usize,

	/// Lowercase names that must never be returned.
	exclusions: HashSet<String>,

	max_attempts: usize,
}

impl<'a> Generator<'a> {
	/// Creates a generator using the full table order, no exclusions and
	/// [`DEFAULT_MAX_ATTEMPTS`].
	pub fn new(table: &'a TransitionTable) -> Self {
		Self {
			table,
			order: table.order(),
			exclusions: HashSet::new(),
			max_attempts: DEFAULT_MAX_ATTEMPTS,
		}
	}

	/// Walks with a shorter lookback than the table order.
	///
	/// # Errors
	/// Returns `InvalidOrder` unless `1 <= order <= table.order()`.
	pub fn with_order(mut self, order: usize) -> Result<Self> {
		if order == 0 || order > self.table.order() {
			return Err(NameGenError::InvalidOrder(order));
		}
		self.order = order;
		Ok(self)
	}

	/// Adds names that must never be generated (compared case-insensitively).
	pub fn with_exclusions<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.exclusions.extend(names.into_iter().map(|name| normalize_name(name.as_ref())));
		self
	}

	/// Sets the number of attempts per name (at least one attempt is made).
	pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
		self.max_attempts = max_attempts;
		self
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn max_attempts(&self) -> usize {
		self.max_attempts
	}

	/// Generates one name satisfying `constraints`.
	///
	/// # Errors
	/// - `InvalidConstraint` if the constraints can never be met
	/// - `GenerationExhausted` if every attempt was rejected
	pub fn generate<R: Rng + ?Sized>(&self, constraints: &GenConstraints, rng: &mut R) -> Result<String> {
		constraints.validate()?;
		self.generate_excluding(constraints, &HashSet::new(), rng)
	}

	/// Generates up to `count` distinct names.
	///
	/// Stops early at the first name whose retry budget is spent; the error
	/// is kept in [`Batch::failures`].
	///
	/// # Errors
	/// Returns `InvalidConstraint` if the constraints can never be met.
	pub fn generate_batch<R: Rng + ?Sized>(
		&self,
		count: usize,
		constraints: &GenConstraints,
		rng: &mut R,
	) -> Result<Batch> {
		constraints.validate()?;
		let mut batch = Batch::default();
		let mut produced = HashSet::new();
		self.fill(&mut batch, &mut produced, count, constraints, rng);
		if batch.names.len() < count {
			log::warn!("generated {} of {} requested names", batch.names.len(), count);
		}
		Ok(batch)
	}

	/// Generates up to `count` distinct names on all CPU cores.
	///
	/// Every worker shares the table and uses its own thread-local RNG.
	/// Names produced by several workers are deduplicated, then the
	/// shortfall is generated on the calling thread.
	///
	/// # Errors
	/// Returns `InvalidConstraint` if the constraints can never be met.
	pub fn generate_parallel(&self, count: usize, constraints: &GenConstraints) -> Result<Batch> {
		constraints.validate()?;
		if count == 0 {
			return Ok(Batch::default());
		}

		let workers = num_cpus::get().clamp(1, count);
		let share = count.div_ceil(workers);

		let partials: Vec<Batch> = thread::scope(|scope| {
			let handles: Vec<_> = (0..workers)
				.map(|worker| {
					let quota = share.min(count.saturating_sub(worker * share));
					scope.spawn(move || {
						let mut batch = Batch::default();
						let mut produced = HashSet::new();
						self.fill(&mut batch, &mut produced, quota, constraints, &mut rand::rng());
						batch
					})
				})
				.collect();

			handles
				.into_iter()
				.filter_map(|handle| match handle.join() {
					Ok(batch) => Some(batch),
					Err(_) => {
						log::error!("generation worker panicked");
						None
					}
				})
				.collect()
		});

		let mut batch = Batch::default();
		let mut produced = HashSet::new();
		for partial in partials {
			for name in partial.names {
				if produced.insert(normalize_name(&name)) {
					batch.names.push(name);
				}
			}
			batch.failures.extend(partial.failures);
		}

		if batch.names.len() < count && batch.failures.is_empty() {
			log::debug!("topping up {} names lost to cross-worker duplicates", count - batch.names.len());
			self.fill(&mut batch, &mut produced, count, constraints, &mut rand::rng());
		}
		if batch.names.len() < count {
			log::warn!("generated {} of {} requested names", batch.names.len(), count);
		}
		Ok(batch)
	}

	/// Adds names to `batch` until it holds `count` of them or a name fails.
	fn fill<R: Rng + ?Sized>(
		&self,
		batch: &mut Batch,
		produced: &mut HashSet<String>,
		count: usize,
		constraints: &GenConstraints,
		rng: &mut R,
	) {
		while batch.names.len() < count {
			match self.generate_excluding(constraints, produced, rng) {
				Ok(name) => {
					produced.insert(normalize_name(&name));
					batch.names.push(name);
				}
				Err(e) => {
					batch.failures.push(e);
					break;
				}
			}
		}
	}

	/// Retries [`Generator::attempt`] within the attempt budget.
	fn generate_excluding<R: Rng + ?Sized>(
		&self,
		constraints: &GenConstraints,
		extra: &HashSet<String>,
		rng: &mut R,
	) -> Result<String> {
		retry(self.max_attempts, |number| {
			let result = self.attempt(constraints, extra, &mut *rng);
			match &result {
				Err(rejection @ Rejection::SparseTable(_)) => {
					log::warn!("attempt {number}: {rejection}");
				}
				Err(rejection) => log::trace!("attempt {number}: {rejection}"),
				Ok(_) => (),
			}
			result
		})
		.map_err(|Exhausted { attempts, last }| NameGenError::GenerationExhausted { attempts, reason: last })
	}

	/// One complete attempt: walk, then check the candidate.
	fn attempt<R: Rng + ?Sized>(
		&self,
		constraints: &GenConstraints,
		extra: &HashSet<String>,
		rng: &mut R,
	) -> std::result::Result<String, Rejection> {
		let name = self.walk(constraints, rng)?;

		if let Some(prefix) = constraints.starts_with() {
			if !name.starts_with(prefix) {
				return Err(Rejection::MissingPrefix(prefix.to_owned()));
			}
		}
		if let Some(suffix) = constraints.ends_with() {
			if !name.ends_with(suffix) {
				return Err(Rejection::MissingSuffix(suffix.to_owned()));
			}
		}
		if !is_well_formed(&name) {
			return Err(Rejection::Malformed(name));
		}
		if self.exclusions.contains(&name) || extra.contains(&name) {
			return Err(Rejection::Duplicate(capitalize(&name)));
		}

		Ok(capitalize(&name))
	}

	/// Random walk from the START context; returns the lowercase candidate.
	///
	/// The prefix, if any, seeds the walk: with a prefix at least `order`
	/// long the first context is its tail, otherwise START padding followed
	/// by the prefix.
	fn walk<R: Rng + ?Sized>(
		&self,
		constraints: &GenConstraints,
		rng: &mut R,
	) -> std::result::Result<String, Rejection> {
		let mut sequence: Vec<char> = std::iter::repeat_n(START_CHAR, self.order).collect();
		if let Some(prefix) = constraints.starts_with() {
			sequence.extend(prefix.chars());
		}
		let mut length = sequence.len() - self.order;

		while length < constraints.max_length {
			// Too short to end yet: END is not an option
			let excluded = (length < constraints.min_length).then_some(END_CHAR);

			let sparse = || {
				let tail = sequence.len().saturating_sub(self.order);
				Rejection::SparseTable(sequence[tail..].iter().collect())
			};
			let state = self.table.lookup(&sequence, self.order, excluded).ok_or_else(sparse)?;
			let next_char = state.predict(rng, excluded).ok_or_else(sparse)?;

			if next_char == END_CHAR {
				break;
			}
			sequence.push(next_char);
			length += 1;
		}

		Ok(sequence[self.order..].iter().collect())
	}
}

/// Generates one name from `table` walking with `order` characters of lookback.
///
/// Convenience over [`Generator`] for single draws.
pub fn generate<R: Rng + ?Sized>(
	table: &TransitionTable,
	order: usize,
	constraints: &GenConstraints,
	exclusions: &HashSet<String>,
	rng: &mut R,
) -> Result<String> {
	Generator::new(table)
		.with_order(order)?
		.with_exclusions(exclusions)
		.generate(constraints, rng)
}

/// Lowercase, single-spaced form used for duplicate checks.
fn normalize_name(name: &str) -> String {
	name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::record::TrainingRecord;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn table(names: &[(&str, u64)], order: usize) -> TransitionTable {
		let records: Vec<TrainingRecord> =
			names.iter().map(|(n, w)| TrainingRecord::new(n, *w).unwrap()).collect();
		TransitionTable::build(&records, order).unwrap()
	}

	const NAMES: [(&str, u64); 8] = [
		("emma", 1000),
		("emmi", 10),
		("aino", 800),
		("eino", 400),
		("juho", 600),
		("juha", 900),
		("onni", 700),
		("anna-liisa", 50),
	];

	#[test]
	fn lengths_stay_within_bounds() {
		let table = table(&NAMES, 2);
		let generator = Generator::new(&table);
		let mut rng = StdRng::seed_from_u64(11);
		let constraints = GenConstraints::new(4, 6);
		for _ in 0..300 {
			let name = generator.generate(&constraints, &mut rng).unwrap();
			let len = name.chars().count();
			assert!((4..=6).contains(&len), "{name} has length {len}");
		}
	}

	#[test]
	fn names_are_capitalized() {
		let table = table(&NAMES, 2);
		let mut rng = StdRng::seed_from_u64(5);
		let name = Generator::new(&table).generate(&GenConstraints::new(3, 10), &mut rng).unwrap();
		assert!(name.chars().next().unwrap().is_uppercase());
		assert_eq!(name.chars().skip(1).filter(|c| c.is_uppercase()).count(), name.matches(['-', ' ', '\'']).count());
	}

	#[test]
	fn prefix_seeds_the_walk() {
		let table = table(&NAMES, 2);
		let generator = Generator::new(&table);
		let mut rng = StdRng::seed_from_u64(3);
		for prefix in ["j", "ju", "emm"] {
			let constraints = GenConstraints::new(3, 10).starting_with(prefix);
			for _ in 0..50 {
				let name = generator.generate(&constraints, &mut rng).unwrap();
				assert!(name.to_lowercase().starts_with(prefix), "{name} lacks {prefix}");
			}
		}
	}

	#[test]
	fn suffix_is_enforced() {
		let table = table(&NAMES, 2);
		let generator = Generator::new(&table);
		let mut rng = StdRng::seed_from_u64(8);
		let constraints = GenConstraints::new(3, 10).ending_with("o");
		for _ in 0..50 {
			let name = generator.generate(&constraints, &mut rng).unwrap();
			assert!(name.ends_with('o'), "{name}");
		}
	}

	#[test]
	fn unsatisfiable_suffix_exhausts_the_budget() {
		let table = table(&NAMES, 2);
		let generator = Generator::new(&table).with_max_attempts(50);
		let mut rng = StdRng::seed_from_u64(2);
		let constraints = GenConstraints::new(3, 10).ending_with("xq");
		match generator.generate(&constraints, &mut rng) {
			Err(NameGenError::GenerationExhausted { attempts, reason }) => {
				assert_eq!(attempts, 50);
				assert_eq!(reason, Rejection::MissingSuffix("xq".to_owned()));
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn training_names_are_never_returned() {
		let table = table(&NAMES, 2);
		let generator = Generator::new(&table).with_exclusions(NAMES.iter().map(|(n, _)| *n));
		let mut rng = StdRng::seed_from_u64(21);
		let constraints = GenConstraints::new(3, 12);
		for _ in 0..200 {
			match generator.generate(&constraints, &mut rng) {
				Ok(name) => assert!(NAMES.iter().all(|(n, _)| !n.eq_ignore_ascii_case(&name)), "{name}"),
				Err(e) => assert!(matches!(e, NameGenError::GenerationExhausted { .. })),
			}
		}
	}

	#[test]
	fn single_name_corpus_only_repeats_a() {
		let table = table(&[("aa", 5)], 1);
		let mut rng = StdRng::seed_from_u64(13);

		let generator = Generator::new(&table);
		for _ in 0..100 {
			let name = generator.generate(&GenConstraints::new(1, 8), &mut rng).unwrap();
			assert!(name.to_lowercase().chars().all(|c| c == 'a'), "{name}");
		}

		// "aa" is the only name of length 2 and it is excluded
		let strict = Generator::new(&table).with_exclusions(["aa"]).with_max_attempts(30);
		match strict.generate(&GenConstraints::new(2, 2), &mut rng) {
			Err(NameGenError::GenerationExhausted { reason, .. }) => {
				assert_eq!(reason, Rejection::Duplicate("Aa".to_owned()));
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn forced_continuation_respects_min_length() {
		// every name ends after two letters
		let table = table(&[("ab", 1), ("ba", 1)], 1);
		let mut rng = StdRng::seed_from_u64(4);
		let name = Generator::new(&table).generate(&GenConstraints::new(5, 5), &mut rng).unwrap();
		assert_eq!(name.chars().count(), 5);
	}

	#[test]
	fn weight_skew_dominates_starts() {
		let table = table(&[("emma", 1000), ("emmi", 10)], 2);
		let generator = Generator::new(&table);
		let mut rng = StdRng::seed_from_u64(99);
		let constraints = GenConstraints::new(3, 12);
		let names: Vec<String> =
			(0..100).map(|_| generator.generate(&constraints, &mut rng).unwrap()).collect();
		let em = names.iter().filter(|n| n.starts_with("Em")).count();
		assert!(em >= 90, "only {em} names start with 'Em'");
		let emma = names.iter().filter(|n| n.as_str() == "Emma").count();
		assert!(emma > names.len() / 2);
	}

	#[test]
	fn lower_generation_order_is_accepted() {
		let table = table(&NAMES, 3);
		assert!(Generator::new(&table).with_order(0).is_err());
		assert!(Generator::new(&table).with_order(4).is_err());

		let generator = Generator::new(&table).with_order(1).unwrap();
		assert_eq!(generator.order(), 1);
		let mut rng = StdRng::seed_from_u64(17);
		let name = generator.generate(&GenConstraints::new(3, 8), &mut rng).unwrap();
		assert!((3..=8).contains(&name.chars().count()));
	}

	#[test]
	fn invalid_constraints_fail_before_any_attempt() {
		let table = table(&NAMES, 2);
		let mut rng = StdRng::seed_from_u64(1);
		let result = Generator::new(&table).generate(&GenConstraints::new(5, 2), &mut rng);
		assert!(matches!(result, Err(NameGenError::InvalidConstraint(_))));
	}

	#[test]
	fn batch_names_are_distinct() {
		// every letter may follow every letter: far more than 15 names fit
		let table = table(&[("abc", 3), ("cba", 3), ("bac", 2), ("aa", 1), ("bb", 1), ("cc", 1)], 1);
		let generator = Generator::new(&table);
		let mut rng = StdRng::seed_from_u64(6);
		let batch = generator.generate_batch(15, &GenConstraints::new(3, 6), &mut rng).unwrap();
		assert_eq!(batch.names.len(), 15);
		let distinct: HashSet<_> = batch.names.iter().collect();
		assert_eq!(distinct.len(), 15);
	}

	#[test]
	fn batch_reports_shortfall() {
		let table = table(&[("aa", 5)], 1);
		let generator = Generator::new(&table).with_max_attempts(40);
		let mut rng = StdRng::seed_from_u64(6);
		// only "A", "Aa" and "Aaa" fit
		let batch = generator.generate_batch(5, &GenConstraints::new(1, 3), &mut rng).unwrap();
		assert_eq!(batch.names.len(), 3);
		assert_eq!(batch.failures.len(), 1);
	}

	#[test]
	fn parallel_batch_is_distinct_and_bounded() {
		let table = table(&NAMES, 2);
		let generator = Generator::new(&table).with_exclusions(NAMES.iter().map(|(n, _)| *n));
		let constraints = GenConstraints::new(3, 9);
		let batch = generator.generate_parallel(20, &constraints).unwrap();
		assert!(batch.names.len() <= 20);
		let distinct: HashSet<_> = batch.names.iter().map(|n| n.to_lowercase()).collect();
		assert_eq!(distinct.len(), batch.names.len());
		for name in &batch.names {
			assert!((3..=9).contains(&name.chars().count()));
		}
	}

	#[test]
	fn free_function_matches_generator() {
		let table = table(&NAMES, 2);
		let exclusions: HashSet<String> = NAMES.iter().map(|(n, _)| n.to_string()).collect();
		let mut rng = StdRng::seed_from_u64(31);
		// aino and anna-liisa are excluded; "an" + "nn" + "ni" is the only other path
		let constraints = GenConstraints::new(3, 10).starting_with("a");
		let name = generate(&table, 2, &constraints, &exclusions, &mut rng).unwrap();
		assert_eq!(name, "Anni");
		assert!(!exclusions.contains(&name.to_lowercase()));
	}
}
