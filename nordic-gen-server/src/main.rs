use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};

use serde::Deserialize;

use nordic_gen_core::io::{list_files, normalize_folder};
use nordic_gen_core::{
	Corpus, DEFAULT_MAX_ATTEMPTS, GenConstraints, Gender, Generator, Language, NameGenError, Selection,
	TransitionTable, stats,
};

/// Upper bound of names returned by one `/v1/generate` call.
const MAX_COUNT: usize = 1000;

/// Upper bound of the per-name attempt budget a client may ask for.
const MAX_ATTEMPTS_LIMIT: usize = 10_000;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	min_length: Option<usize>,
	max_length: Option<usize>,
	start: Option<String>,
	end: Option<String>,
	allow_duplicates: Option<bool>,
	max_attempts: Option<usize>,
}

impl GenerateParams {
	fn constraints(&self) -> GenConstraints {
		GenConstraints::new(self.min_length.unwrap_or(3), self.max_length.unwrap_or(12))
			.starting_with(self.start.as_deref().unwrap_or(""))
			.ending_with(self.end.as_deref().unwrap_or(""))
	}
}

/// Struct representing query parameters for the `/v1/load` endpoint
#[derive(Deserialize)]
struct LoadQuery {
	language: Option<String>,
	gender: Option<String>,
	order: Option<usize>,
}

/// Trained table and the corpus it came from.
///
/// Both are immutable once built; a reload swaps the whole value.
#[derive(Clone)]
struct Loaded {
	table: Arc<TransitionTable>,
	corpus: Arc<Corpus>,
}

struct SharedData {
	names_dir: PathBuf,
	loaded: RwLock<Option<Loaded>>,
}

impl SharedData {
	fn new(names_dir: PathBuf) -> Self {
		Self { names_dir, loaded: RwLock::new(None) }
	}

	/// Clones the current model out of the lock, so generation runs unlocked.
	fn current(&self) -> Result<Loaded, HttpResponse> {
		let loaded = self
			.loaded
			.read()
			.map_err(|_| HttpResponse::InternalServerError().body("Model lock failed"))?;
		loaded
			.clone()
			.ok_or_else(|| HttpResponse::Conflict().body("No corpus loaded, PUT /v1/load first"))
	}
}

/// GET `/v1/generate`
///
/// Generates names from the loaded table based on query parameters.
/// Returns one name per line.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(10);
	if count > MAX_COUNT {
		return HttpResponse::BadRequest().body(format!("count must be <= {MAX_COUNT}"));
	}
	let max_attempts = query.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
	if max_attempts > MAX_ATTEMPTS_LIMIT {
		return HttpResponse::BadRequest().body(format!("max_attempts must be <= {MAX_ATTEMPTS_LIMIT}"));
	}

	let loaded = match data.current() {
		Ok(loaded) => loaded,
		Err(response) => return response,
	};

	let mut generator = Generator::new(&loaded.table).with_max_attempts(max_attempts);
	if !query.allow_duplicates.unwrap_or(false) {
		generator = generator.with_exclusions(loaded.corpus.names());
	}

	match generator.generate_batch(count, &query.constraints(), &mut rand::rng()) {
		Ok(batch) if batch.names.is_empty() && count > 0 => {
			let reason = batch.failures.first().map(ToString::to_string).unwrap_or_default();
			HttpResponse::UnprocessableEntity().body(reason)
		}
		Ok(batch) => HttpResponse::Ok().body(batch.names.join("\n")),
		Err(e @ NameGenError::InvalidConstraint(_)) => HttpResponse::BadRequest().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// GET `/v1/stats`: statistics of the loaded table as JSON.
#[get("/v1/stats")]
async fn get_stats(data: web::Data<SharedData>) -> impl Responder {
	match data.current() {
		Ok(loaded) => HttpResponse::Ok().json(stats(&loaded.table, &loaded.corpus.records())),
		Err(response) => response,
	}
}

/// GET `/v1/corpora`: CSV files available in the names directory.
#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match list_files(&data.names_dir, "csv") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".csv", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

/// PUT `/v1/load`: trains a new table and replaces the current one.
#[put("/v1/load")]
async fn put_load(data: web::Data<SharedData>, query: web::Query<LoadQuery>) -> impl Responder {
	let languages: Selection<Language> = match query.language.as_deref().unwrap_or("finnish").parse() {
		Ok(languages) => languages,
		Err(e) => return HttpResponse::BadRequest().body(format!("{e}")),
	};
	let genders: Selection<Gender> = match query.gender.as_deref().unwrap_or("both").parse() {
		Ok(genders) => genders,
		Err(e) => return HttpResponse::BadRequest().body(format!("{e}")),
	};
	let order = query.order.unwrap_or(2);

	let corpus = match Corpus::load(&data.names_dir, languages, genders) {
		Ok(corpus) => corpus,
		Err(e @ NameGenError::EmptyCorpus) => return HttpResponse::NotFound().body(e.to_string()),
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
	};
	let records = corpus.records();
	let table = match TransitionTable::build_parallel(&records, order) {
		Ok(table) => table,
		Err(e @ NameGenError::InvalidOrder(_)) => return HttpResponse::BadRequest().body(e.to_string()),
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to train model: {e}")),
	};
	let contexts = table.unique_contexts();

	let mut loaded = match data.loaded.write() {
		Ok(loaded) => loaded,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	*loaded = Some(Loaded { table: Arc::new(table), corpus: Arc::new(corpus) });
	log::info!("loaded {} names, {} contexts of order {}", records.len(), contexts, order);

	HttpResponse::Ok().body(format!("Loaded {} names ({} contexts)", records.len(), contexts))
}

fn routes(config: &mut web::ServiceConfig) {
	config
		.service(get_generated)
		.service(get_stats)
		.service(get_corpora)
		.service(put_load);
}

/// Main entry point for the server.
///
/// Starts with no corpus loaded; clients `PUT /v1/load` first.
///
/// # Notes
/// - Binds to `NORDIC_GEN_HOST:NORDIC_GEN_PORT` (default 127.0.0.1:5000).
/// - Reads corpora from `NORDIC_GEN_NAMES_DIR` (default `names`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let host = std::env::var("NORDIC_GEN_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
	let port = match std::env::var("NORDIC_GEN_PORT") {
		Ok(port) => port
			.parse::<u16>()
			.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("NORDIC_GEN_PORT: {e}")))?,
		Err(_) => 5000,
	};
	let names_dir = normalize_folder(&std::env::var("NORDIC_GEN_NAMES_DIR").unwrap_or_else(|_| "names".to_owned()));
	log::info!("serving corpora from {} on {}:{}", names_dir.display(), host, port);

	let shared_data = web::Data::new(SharedData::new(names_dir));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(routes)
	})
		.bind((host.as_str(), port))?
		.run()
		.await
}
