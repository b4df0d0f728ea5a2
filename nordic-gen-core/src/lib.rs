//! Finnish and Swedish given-name generation library.
//!
//! This crate provides a character-level Markov name generator including:
//! - Training on prevalence-weighted name lists
//! - Context fallback down to the unigram distribution
//! - Length, prefix, suffix and duplicate constraints with bounded retries
//! - Parallel training and batch generation over one immutable table
//! - Loading of the Finnish and Swedish CSV name exports
//!
//! ```no_run
//! use nordic_gen_core::{Corpus, GenConstraints, Generator, Selection, TransitionTable};
//!
//! # fn main() -> nordic_gen_core::Result<()> {
//! let corpus = Corpus::load("names", Selection::Both, Selection::Both)?;
//! let records = corpus.records();
//! let table = TransitionTable::build(&records, 2)?;
//! let generator = Generator::new(&table).with_exclusions(corpus.names());
//! let name = generator.generate(&GenConstraints::new(3, 12), &mut rand::rng())?;
//! println!("{name}");
//! # Ok(())
//! # }
//! ```

/// Markov model: training, table, generation and statistics.
pub mod model;

/// CSV name lists per language and gender.
pub mod corpus;

/// Generation settings and their TOML form.
pub mod config;

/// Error types.
pub mod error;

/// File helpers (decoding, directory listing).
pub mod io;

pub use config::GenerationConfig;
pub use corpus::{Corpus, Gender, Language, Selection, Source};
pub use error::{NameGenError, Rejection, Result};
pub use model::constraints::GenConstraints;
pub use model::generator::{Batch, DEFAULT_MAX_ATTEMPTS, Generator, generate};
pub use model::record::TrainingRecord;
pub use model::stats::{ModelStats, stats};
pub use model::table::{END_CHAR, START_CHAR, TransitionTable};
