use std::sync::mpsc;
use std::thread;

use super::context_model::ContextModel;
use super::record::TrainingRecord;
use super::state::State;
use crate::error::{NameGenError, Result};

/// Sentinel padding the beginning of every training name.
pub const START_CHAR: char = '^';

/// Sentinel closing every training name.
pub const END_CHAR: char = '$';

/// Character transition statistics of a weighted name corpus.
///
/// The table holds one [`ContextModel`] per back-off level: `levels[order]`
/// stores the full-order contexts, `levels[k]` the `k`-character suffixes of
/// those contexts and `levels[0]` the global (unigram) distribution.
///
/// Built once by [`TransitionTable::build`], then only read. It can be shared
/// by reference across threads for parallel generation.
///
/// # Invariants
/// - `order >= 1`
/// - `levels.len() == order + 1` and `levels[k]` only holds `k`-length keys
/// - every transition weight is the sum of the weights of the records that
///   produced it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
	order: usize,
	levels: Vec<ContextModel>,
}

impl TransitionTable {
	/// Creates an empty table of the given order.
	fn empty(order: usize) -> Self {
		Self { order, levels: (0..=order).map(ContextModel::new).collect() }
	}

	/// Builds the transition table of `records`.
	///
	/// Each name is padded as `START^order + name + END`; every window of
	/// `order` characters is a context and the character following it the
	/// outcome. The record weight is added to the context and to each of its
	/// suffixes.
	///
	/// Accumulation is commutative: the table does not depend on the order
	/// of `records`.
	///
	/// # Errors
	/// - `InvalidOrder` if `order == 0`
	/// - `EmptyCorpus` if `records` is empty
	pub fn build(records: &[TrainingRecord], order: usize) -> Result<Self> {
		Self::check_input(records, order)?;

		let mut table = Self::empty(order);
		for record in records {
			table.add_record(record);
		}

		log::debug!(
			"trained order-{} table on {} records: {} contexts",
			order,
			records.len(),
			table.unique_contexts()
		);
		Ok(table)
	}

	/// Builds the same table as [`TransitionTable::build`] on several threads.
	///
	/// Splits the records into chunks (based on CPU cores * factor), trains a
	/// partial table per chunk and merges the partial tables.
	///
	/// # Notes
	/// - Uses MPSC channels to collect partial tables from threads.
	pub fn build_parallel(records: &[TrainingRecord], order: usize) -> Result<Self> {
		Self::check_input(records, order)?;

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = records.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		for chunk in records.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<TrainingRecord> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial = TransitionTable::empty(order);
				for record in &chunk {
					partial.add_record(record);
				}
				if tx.send(partial).is_err() {
					log::warn!("partial table dropped: receiver closed");
				}
			});
		}
		drop(tx);

		let mut table = Self::empty(order);
		for partial in rx.iter() {
			table.merge(&partial)?;
		}

		log::debug!(
			"trained order-{} table on {} records with {} chunks: {} contexts",
			order,
			records.len(),
			records.len().div_ceil(chunk_size),
			table.unique_contexts()
		);
		Ok(table)
	}

	fn check_input(records: &[TrainingRecord], order: usize) -> Result<()> {
		if order == 0 {
			return Err(NameGenError::InvalidOrder(order));
		}
		if records.is_empty() {
			return Err(NameGenError::EmptyCorpus);
		}
		Ok(())
	}

	/// Adds every window of one padded record to the table.
	fn add_record(&mut self, record: &TrainingRecord) {
		let padded: Vec<char> = std::iter::repeat_n(START_CHAR, self.order)
			.chain(record.text().chars())
			.chain(std::iter::once(END_CHAR))
			.collect();

		for window in padded.windows(self.order + 1) {
			let (context, next) = window.split_at(self.order);
			let next_char = next[0];
			for (k, level) in self.levels.iter_mut().enumerate() {
				let suffix: String = context[self.order - k..].iter().collect();
				level.add_transition(&suffix, next_char, record.weight());
			}
		}
	}

	/// Merges another table of the same order into this one.
	///
	/// # Errors
	/// Returns `Merge` if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(NameGenError::Merge(format!(
				"order mismatch: {} vs {}",
				self.order, other.order
			)));
		}
		for (level, other_level) in self.levels.iter_mut().zip(&other.levels) {
			level.merge(other_level).map_err(NameGenError::Merge)?;
		}
		Ok(())
	}

	/// Order the table was trained with.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct full-order contexts.
	pub fn unique_contexts(&self) -> usize {
		self.levels[self.order].len()
	}

	/// Exact lookup of a context of any length `0..=order`.
	pub fn state(&self, context: &str) -> Option<&State> {
		self.levels.get(context.chars().count())?.get(context)
	}

	/// Iterates over the full-order contexts.
	pub fn contexts(&self) -> impl Iterator<Item = &str> {
		self.levels[self.order].contexts()
	}

	/// Finds the distribution to sample from after `sequence`.
	///
	/// Starts with the last `lookback` characters of `sequence` and drops the
	/// oldest character until a state with an outcome other than `excluded`
	/// is found, down to the empty context.
	///
	/// Returns `None` if even the unigram level has nothing to offer.
	pub fn lookup(&self, sequence: &[char], lookback: usize, excluded: Option<char>) -> Option<&State> {
		let longest = lookback.min(self.order).min(sequence.len());
		(0..=longest).rev().find_map(|k| {
			let context: String = sequence[sequence.len() - k..].iter().collect();
			self.levels[k]
				.get(&context)
				.filter(|state| state.has_outcome_besides(excluded))
		})
	}
}
