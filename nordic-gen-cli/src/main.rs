mod args;
mod output;

use anyhow::{Context, Result};
use clap::Parser;

use nordic_gen_core::{
	Corpus, Gender, GenConstraints, GenerationConfig, Generator, Language, Selection, TransitionTable, stats,
};

use crate::args::Args;

fn main() -> Result<()> {
	let args = Args::parse();
	args.init_logging();
	let config = args.resolve_config()?;
	log::debug!("configuration: {config:?}");
	run(&args, &config)
}

fn run(args: &Args, config: &GenerationConfig) -> Result<()> {
	let languages: Selection<Language> = args.language.into();
	let genders: Selection<Gender> = args.gender.into();

	// Load the names with prevalence weights (one or both languages)
	let corpus = Corpus::load(&config.names_dir, languages, genders).with_context(|| {
		format!(
			"no names found for {} {:?} in {}",
			output::language_name(languages),
			args.gender,
			config.names_dir.display()
		)
	})?;

	println!("{}", output::banner(languages));
	for gender in genders.genders() {
		println!("Loaded {} {} {} names", corpus.count(gender), output::language_name(languages), gender);
	}
	let records = corpus.records();
	if genders == Selection::Both {
		println!("Total: {} {} names (boys and girls)", records.len(), output::language_name(languages));
	}

	let table = if config.parallel {
		TransitionTable::build_parallel(&records, config.order)
	} else {
		TransitionTable::build(&records, config.order)
	}
	.context("failed to train the model")?;

	if args.stats {
		println!("{}", output::stats_block(&stats(&table, &records)));
	}

	let mut generator = Generator::new(&table).with_max_attempts(config.max_attempts);
	if !args.allow_duplicates {
		generator = generator.with_exclusions(corpus.names());
	}
	let constraints = GenConstraints::new(config.min_length, config.max_length)
		.starting_with(&args.start)
		.ending_with(&args.end);

	println!("{}", output::generation_header(config.count, &args.start, &args.end, args.allow_duplicates));

	let batch = if config.parallel {
		generator.generate_parallel(config.count, &constraints)
	} else {
		generator.generate_batch(config.count, &constraints, &mut rand::rng())
	}
	.context("invalid generation parameters")?;

	let mut names = batch.names;
	names.sort();
	for (i, name) in names.iter().enumerate() {
		println!("{}", output::name_line(i + 1, name, &corpus, args.allow_duplicates));
	}

	if names.len() < config.count {
		println!("\nNote: Only generated {} names.", names.len());
		if let Some(failure) = batch.failures.first() {
			println!("Reason: {failure}");
		}
	}

	Ok(())
}
