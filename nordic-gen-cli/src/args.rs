use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use nordic_gen_core::{Gender, GenerationConfig, Language, Selection};

/// Generate Finnish or Swedish names using Markov chains
#[derive(Debug, Parser)]
#[command(name = "nordic-gen", version, about)]
pub struct Args {
	/// Language of names to generate ("both" blends Finnish and Swedish)
	#[arg(long, value_enum, default_value = "finnish")]
	pub language: LanguageArg,

	/// Gender of names to generate
	#[arg(long, value_enum, default_value = "both")]
	pub gender: GenderArg,

	/// Number of names to generate
	#[arg(long)]
	pub count: Option<usize>,

	/// Markov chain order (complexity)
	#[arg(long)]
	pub order: Option<usize>,

	/// Minimum name length
	#[arg(long)]
	pub min_length: Option<usize>,

	/// Maximum name length
	#[arg(long)]
	pub max_length: Option<usize>,

	/// Starting string for generated names (e.g. "ju")
	#[arg(long, default_value = "")]
	pub start: String,

	/// Ending string for generated names (e.g. "o")
	#[arg(long, default_value = "")]
	pub end: String,

	/// Show model statistics
	#[arg(long)]
	pub stats: bool,

	/// Allow generating names that already exist in the training data
	#[arg(long)]
	pub allow_duplicates: bool,

	/// Attempts per name before giving up
	#[arg(long)]
	pub max_attempts: Option<usize>,

	/// Generate on all CPU cores
	#[arg(long)]
	pub parallel: bool,

	/// Directory holding the <language>_<gender>.csv files
	#[arg(long, value_name = "DIR", env = "NORDIC_GEN_NAMES_DIR")]
	pub names_dir: Option<PathBuf>,

	/// TOML configuration file
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Increase verbosity
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
	Finnish,
	Swedish,
	Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
	Boys,
	Girls,
	Both,
}

impl From<LanguageArg> for Selection<Language> {
	fn from(arg: LanguageArg) -> Self {
		match arg {
			LanguageArg::Finnish => Selection::One(Language::Finnish),
			LanguageArg::Swedish => Selection::One(Language::Swedish),
			LanguageArg::Both => Selection::Both,
		}
	}
}

impl From<GenderArg> for Selection<Gender> {
	fn from(arg: GenderArg) -> Self {
		match arg {
			GenderArg::Boys => Selection::One(Gender::Boys),
			GenderArg::Girls => Selection::One(Gender::Girls),
			GenderArg::Both => Selection::Both,
		}
	}
}

impl Args {
	/// Defaults, overridden by the configuration file, overridden by flags.
	pub fn resolve_config(&self) -> Result<GenerationConfig> {
		let mut config = match &self.config {
			Some(path) => GenerationConfig::load(path)
				.with_context(|| format!("failed to read configuration {}", path.display()))?,
			None => GenerationConfig::default(),
		};

		if let Some(order) = self.order {
			config.order = order;
		}
		if let Some(count) = self.count {
			config.count = count;
		}
		if let Some(min_length) = self.min_length {
			config.min_length = min_length;
		}
		if let Some(max_length) = self.max_length {
			config.max_length = max_length;
		}
		if let Some(max_attempts) = self.max_attempts {
			config.max_attempts = max_attempts;
		}
		if let Some(names_dir) = &self.names_dir {
			config.names_dir = names_dir.clone();
		}
		config.parallel |= self.parallel;

		Ok(config)
	}

	/// Initialize logging based on verbosity level
	pub fn init_logging(&self) {
		let log_level = match self.verbose {
			0 => "warn",
			1 => "info",
			2 => "debug",
			_ => "trace",
		};
		env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
	}
}
