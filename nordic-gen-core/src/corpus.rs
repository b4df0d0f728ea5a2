//! Loading of the prevalence-weighted name lists.
//!
//! Corpora are CSV files named `<language>_<gender>.csv` in a names
//! directory. Finnish exports are comma separated without a header and
//! write large prevalences with a thousands separator (`"29,887"`);
//! Swedish exports are semicolon separated and start with a header row.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{NameGenError, Result};
use crate::io::read_lines;
use crate::model::record::TrainingRecord;

/// Names of header cells found in the exports.
const HEADER_NAMES: [&str; 3] = ["förnamn", "f\u{fffd}rnamn", "name"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
	Finnish,
	Swedish,
}

impl Language {
	pub const ALL: [Language; 2] = [Language::Finnish, Language::Swedish];

	fn file_prefix(self) -> &'static str {
		match self {
			Language::Finnish => "finnish",
			Language::Swedish => "swedish",
		}
	}

	fn delimiter(self) -> char {
		match self {
			Language::Finnish => ',',
			Language::Swedish => ';',
		}
	}

	fn has_header(self) -> bool {
		matches!(self, Language::Swedish)
	}

	/// Short label used when reporting prevalence (`FI`, `SE`).
	pub fn code(self) -> &'static str {
		match self {
			Language::Finnish => "FI",
			Language::Swedish => "SE",
		}
	}
}

impl fmt::Display for Language {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Language::Finnish => write!(f, "Finnish"),
			Language::Swedish => write!(f, "Swedish"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
	Boys,
	Girls,
}

impl Gender {
	pub const ALL: [Gender; 2] = [Gender::Boys, Gender::Girls];

	fn file_stem(self) -> &'static str {
		match self {
			Gender::Boys => "male",
			Gender::Girls => "female",
		}
	}
}

impl fmt::Display for Gender {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Gender::Boys => write!(f, "boys"),
			Gender::Girls => write!(f, "girls"),
		}
	}
}

/// Which languages or genders to train on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection<T> {
	One(T),
	Both,
}

impl Selection<Language> {
	pub fn languages(self) -> Vec<Language> {
		match self {
			Selection::One(language) => vec![language],
			Selection::Both => Language::ALL.to_vec(),
		}
	}
}

impl Selection<Gender> {
	pub fn genders(self) -> Vec<Gender> {
		match self {
			Selection::One(gender) => vec![gender],
			Selection::Both => Gender::ALL.to_vec(),
		}
	}
}

impl FromStr for Selection<Language> {
	type Err = NameGenError;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_lowercase().as_str() {
			"finnish" => Ok(Selection::One(Language::Finnish)),
			"swedish" => Ok(Selection::One(Language::Swedish)),
			"both" => Ok(Selection::Both),
			other => Err(NameGenError::Config(format!("unknown language '{other}'"))),
		}
	}
}

impl FromStr for Selection<Gender> {
	type Err = NameGenError;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_lowercase().as_str() {
			"boys" => Ok(Selection::One(Gender::Boys)),
			"girls" => Ok(Selection::One(Gender::Girls)),
			"both" => Ok(Selection::Both),
			other => Err(NameGenError::Config(format!("unknown gender '{other}'"))),
		}
	}
}

/// Records of one `<language>_<gender>.csv` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
	pub language: Language,
	pub gender: Gender,
	pub records: Vec<TrainingRecord>,
}

/// Training names of a language/gender selection, kept per source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
	sources: Vec<Source>,
}

impl Corpus {
	/// Loads every file of the selection from `dir`.
	///
	/// A missing file is reported as a warning and contributes no names.
	///
	/// # Errors
	/// - `Io` if an existing file cannot be read
	/// - `EmptyCorpus` if no usable name was found at all
	pub fn load<P: AsRef<Path>>(
		dir: P,
		languages: Selection<Language>,
		genders: Selection<Gender>,
	) -> Result<Self> {
		let mut sources = Vec::new();
		for language in languages.languages() {
			for gender in genders.genders() {
				let path = file_path(dir.as_ref(), language, gender);
				let records = if path.exists() {
					parse_lines(&path, &read_lines(&path)?, language)
				} else {
					log::warn!("could not load {} {} names: {} not found", language, gender, path.display());
					Vec::new()
				};
				log::info!("loaded {} {} {} names", records.len(), language, gender);
				sources.push(Source { language, gender, records });
			}
		}

		Self::from_sources(sources)
	}

	/// Wraps already parsed sources.
	///
	/// # Errors
	/// Returns `EmptyCorpus` if the sources hold no record.
	pub fn from_sources(sources: Vec<Source>) -> Result<Self> {
		if sources.iter().all(|source| source.records.is_empty()) {
			return Err(NameGenError::EmptyCorpus);
		}
		Ok(Self { sources })
	}

	pub fn sources(&self) -> &[Source] {
		&self.sources
	}

	/// All records, in source order.
	pub fn records(&self) -> Vec<TrainingRecord> {
		self.sources.iter().flat_map(|source| source.records.iter().cloned()).collect()
	}

	/// Number of records loaded for `gender`, across languages.
	pub fn count(&self, gender: Gender) -> usize {
		self.sources
			.iter()
			.filter(|source| source.gender == gender)
			.map(|source| source.records.len())
			.sum()
	}

	/// Iterates over the normalized training names.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.sources.iter().flat_map(|source| source.records.iter().map(TrainingRecord::text))
	}

	/// Summed prevalence of `name` in `language` (case-insensitive), if present.
	pub fn prevalence(&self, language: Language, name: &str) -> Option<u64> {
		let name = name.to_lowercase();
		let weights: Vec<u64> = self
			.sources
			.iter()
			.filter(|source| source.language == language)
			.flat_map(|source| source.records.iter())
			.filter(|record| record.text() == name)
			.map(TrainingRecord::weight)
			.collect();
		if weights.is_empty() {
			None
		} else {
			Some(weights.iter().fold(0u64, |total, weight| total.saturating_add(*weight)))
		}
	}
}

/// `<dir>/<language>_<gender>.csv`
pub fn file_path(dir: &Path, language: Language, gender: Gender) -> PathBuf {
	dir.join(format!("{}_{}.csv", language.file_prefix(), gender.file_stem()))
}

/// Parses the lines of one export; invalid rows are skipped.
pub fn parse_lines(path: &Path, lines: &[String], language: Language) -> Vec<TrainingRecord> {
	let skip = usize::from(language.has_header());
	lines
		.iter()
		.enumerate()
		.skip(skip)
		.filter_map(|(index, line)| match parse_row(line, language) {
			Ok(record) => record,
			Err(reason) => {
				let error = NameGenError::Corpus { path: path.to_path_buf(), line: index + 1, reason };
				log::debug!("skipping row: {error}");
				None
			}
		})
		.collect()
}

/// Parses one row. `Ok(None)` marks rows that are silently ignored
/// (blank lines, header cells, empty names).
fn parse_row(line: &str, language: Language) -> std::result::Result<Option<TrainingRecord>, String> {
	if line.trim().is_empty() {
		return Ok(None);
	}
	let fields = split_fields(line, language.delimiter());
	if fields.len() < 2 {
		return Err("expected a name and a prevalence".to_owned());
	}

	let name = unquote(&fields[0]);
	if name.is_empty() || HEADER_NAMES.contains(&name.to_lowercase().as_str()) {
		return Ok(None);
	}

	let weight = parse_prevalence(&fields[1])?;
	TrainingRecord::new(name, weight).map(Some).map_err(|e| e.to_string())
}

/// Splits `line` on `delimiter`, ignoring delimiters inside double quotes.
/// A doubled quote inside a quoted field stands for one quote.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
	let mut fields = Vec::new();
	let mut field = String::new();
	let mut in_quotes = false;
	let mut chars = line.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'"' if in_quotes && chars.peek() == Some(&'"') => {
				field.push('"');
				chars.next();
			}
			'"' => in_quotes = !in_quotes,
			c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut field)),
			c => field.push(c),
		}
	}
	fields.push(field);
	fields
}

fn unquote(field: &str) -> &str {
	field.trim().trim_matches('"').trim()
}

/// Parses `15`, `"29,887"` or `1 204` into a positive count.
fn parse_prevalence(field: &str) -> std::result::Result<u64, String> {
	let digits: String = unquote(field)
		.chars()
		.filter(|c| !matches!(c, ',' | ' ' | '\u{a0}'))
		.collect();
	match digits.parse::<u64>() {
		Ok(0) => Err("prevalence must be positive".to_owned()),
		Ok(weight) => Ok(weight),
		Err(_) => Err(format!("invalid prevalence '{}'", field.trim())),
	}
}
