use serde::{Deserialize, Serialize};

use super::record::TrainingRecord;
use super::table::TransitionTable;

/// Summary of a trained table and the records it was built from.
///
/// Computed on demand by [`stats`]; nothing here is stored in the table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelStats {
	pub training_count: usize,
	pub total_weight: u64,
	pub avg_weight: f64,
	pub unique_contexts: usize,
	pub avg_length: f64,
	pub order: usize,
}

/// Derives the statistics of `table` trained on `records`.
///
/// Averages are 0 when `records` is empty; the total weight saturates at
/// `u64::MAX`.
pub fn stats(table: &TransitionTable, records: &[TrainingRecord]) -> ModelStats {
	let training_count = records.len();
	let total_weight = records.iter().fold(0u64, |total, record| total.saturating_add(record.weight()));
	let total_length: usize = records.iter().map(TrainingRecord::char_count).sum();

	let average = |sum: f64| if training_count == 0 { 0.0 } else { sum / training_count as f64 };

	ModelStats {
		training_count,
		total_weight,
		avg_weight: average(total_weight as f64),
		unique_contexts: table.unique_contexts(),
		avg_length: average(total_length as f64),
		order: table.order(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stats_summarize_records_and_table() {
		let records = vec![
			TrainingRecord::new("Emma", 1000).unwrap(),
			TrainingRecord::new("Emmi", 10).unwrap(),
			TrainingRecord::new("Åke", 2).unwrap(),
		];
		let table = TransitionTable::build(&records, 2).unwrap();
		let stats = stats(&table, &records);

		assert_eq!(stats.training_count, 3);
		assert_eq!(stats.total_weight, 1012);
		assert!((stats.avg_weight - 1012.0 / 3.0).abs() < 1e-9);
		assert!((stats.avg_length - 11.0 / 3.0).abs() < 1e-9);
		assert_eq!(stats.unique_contexts, table.unique_contexts());
		assert_eq!(stats.order, 2);
	}

	#[test]
	fn huge_prevalences_do_not_overflow() {
		let records = vec![TrainingRecord::new("Emma", u64::MAX).unwrap(), TrainingRecord::new("Aino", 1).unwrap()];
		let table = TransitionTable::build(&records, 2).unwrap();
		let stats = stats(&table, &records);
		assert_eq!(stats.total_weight, u64::MAX);
		assert_eq!(stats.training_count, 2);
	}

	#[test]
	fn empty_record_list_has_zero_averages() {
		let records = vec![TrainingRecord::new("Aino", 4).unwrap()];
		let table = TransitionTable::build(&records, 1).unwrap();
		let stats = stats(&table, &[]);
		assert_eq!(stats.training_count, 0);
		assert_eq!(stats.avg_weight, 0.0);
		assert_eq!(stats.avg_length, 0.0);
	}
}
