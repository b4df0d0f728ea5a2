//! Text rendering of the command output

use nordic_gen_core::{Corpus, Language, ModelStats, Selection};

/// Human readable name of the language selection.
pub fn language_name(languages: Selection<Language>) -> String {
	match languages {
		Selection::One(language) => language.to_string(),
		Selection::Both => "Finnish & Swedish".to_owned(),
	}
}

fn flag(languages: Selection<Language>) -> &'static str {
	match languages {
		Selection::One(Language::Finnish) => "🇫🇮",
		Selection::One(Language::Swedish) => "🇸🇪",
		Selection::Both => "🇫🇮🇸🇪",
	}
}

pub fn banner(languages: Selection<Language>) -> String {
	format!(
		"{} {} Name Generator using Markov Chains\n{}",
		flag(languages),
		language_name(languages),
		"=".repeat(60)
	)
}

pub fn stats_block(stats: &ModelStats) -> String {
	format!(
		"\nModel Statistics:\n  \
		 Training names: {}\n  \
		 Total prevalence weight: {}\n  \
		 Average prevalence: {:.1}\n  \
		 Unique contexts: {}\n  \
		 Chain order: {}\n  \
		 Average name length: {:.1}\n",
		stats.training_count,
		group_thousands(stats.total_weight),
		stats.avg_weight,
		stats.unique_contexts,
		stats.order,
		stats.avg_length,
	)
}

/// "Generating 10 names starting with 'ju', ending with 'o':" and its rule.
pub fn generation_header(count: usize, start: &str, end: &str, allow_duplicates: bool) -> String {
	let duplicate_info = if allow_duplicates { " (including training data)" } else { "" };
	let mut parts = Vec::new();
	if !start.trim().is_empty() {
		parts.push(format!("starting with '{}'", start.trim()));
	}
	if !end.trim().is_empty() {
		parts.push(format!("ending with '{}'", end.trim()));
	}

	if parts.is_empty() {
		format!("\nGenerating {count} names{duplicate_info}:\n{}", "-".repeat(40))
	} else {
		format!("\nGenerating {count} names {}{duplicate_info}:\n{}", parts.join(", "), "-".repeat(50))
	}
}

/// One numbered output line.
///
/// With `show_prevalence`, names found in the training data are annotated
/// with their prevalence per language.
pub fn name_line(index: usize, name: &str, corpus: &Corpus, show_prevalence: bool) -> String {
	let mut line = format!("{index:2}. {name}");
	if show_prevalence {
		let parts: Vec<String> = Language::ALL
			.iter()
			.filter_map(|language| {
				corpus
					.prevalence(*language, name)
					.map(|weight| format!("{}: {}", language.code(), group_thousands(weight)))
			})
			.collect();
		if !parts.is_empty() {
			line.push_str(&format!("  ({})", parts.join(" | ")));
		}
	}
	line
}

/// `29887` → `29,887`
pub fn group_thousands(value: u64) -> String {
	let digits = value.to_string();
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(c);
	}
	grouped
}
