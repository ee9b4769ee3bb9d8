// ---------------------------------------------------------------------------
// CatalogServer — JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes JSON-RPC 2.0 requests (NDJSON over stdin) to the catalog engine.
// Reads always go through the current snapshot; writes go to storage and
// then republish the snapshot.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::json;

use crate::config::ServerConfig;
use crate::error::CatalogError;
use crate::import::{import_dir, ImportFailure};
use crate::protocol::*;
use crate::query::{query, QuerySpec, RawQuerySpec};
use crate::shelves::{default_shelves, mood_shelves};
use crate::similarity::{recommend_scored, similarity_breakdown};
use crate::snapshot::SnapshotCell;
use crate::storage::{CatalogStorage, MemoryStorage};
use crate::transport::NdjsonTransport;
use crate::types::{CatalogEntry, RawStoryRecord, Recommendation};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct CatalogServer<W: Write> {
	transport: NdjsonTransport<W>,
	storage: MemoryStorage,
	snapshot: SnapshotCell,
	config: ServerConfig,
}

impl<W: Write> CatalogServer<W> {
	/// Create a server over `storage` and publish its first snapshot.
	pub fn new(
		transport: NdjsonTransport<W>,
		storage: MemoryStorage,
		config: ServerConfig,
	) -> Result<Self, CatalogError> {
		let snapshot = SnapshotCell::default();
		snapshot.refresh_from(&storage)?;
		Ok(Self {
			transport,
			storage,
			snapshot,
			config,
		})
	}

	pub fn snapshot(&self) -> &SnapshotCell {
		&self.snapshot
	}

	pub fn into_transport(self) -> NdjsonTransport<W> {
		self.transport
	}

	/// Main loop over stdin.
	pub fn run(&mut self) -> Result<(), CatalogError> {
		let stdin = io::stdin();
		self.serve(stdin.lock())
	}

	/// Read JSON-RPC messages line by line from `reader` and dispatch them.
	pub fn serve<R: BufRead>(&mut self, reader: R) -> Result<(), CatalogError> {
		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(&line) {
				Ok(r) => r,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		tracing::debug!(id, method = %req.method, "request");
		let result = match req.method.as_str() {
			// -- Reads ---------------------------------------------------
			"catalog/query" => self.handle_query(req.params),
			"catalog/facets" => self.handle_facets(),
			"catalog/getEntry" => self.handle_get_entry(req.params),
			"catalog/recommend" => self.handle_recommend(req.params),
			"catalog/similarity" => self.handle_similarity(req.params),
			"catalog/shelves" => self.handle_shelves(req.params),

			// -- Writes --------------------------------------------------
			"catalog/create" => self.handle_create(req.params),
			"catalog/import" => self.handle_import(req.params),

			// -- Unknown -------------------------------------------------
			_ => {
				self.transport.write_error(
					id,
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				let code = match e {
					CatalogError::InvalidArgument(_) => INVALID_PARAMS,
					_ => CATALOG_ERROR,
				};
				self.transport
					.write_error(id, code, e.to_string(), Some(e.to_json_rpc_error()));
			}
		}
	}

	// ── Reads ─────────────────────────────────────────────────────────────

	fn handle_query(&self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let raw: RawQuerySpec = parse_params(params)?;
		let spec = QuerySpec::try_from(raw)?;
		let snapshot = self.snapshot.load();
		let entries = summaries(&query(snapshot.entries(), &spec));
		Ok(json!({ "entries": entries }))
	}

	fn handle_facets(&self) -> Result<serde_json::Value, CatalogError> {
		let snapshot = self.snapshot.load();
		Ok(serde_json::to_value(snapshot.facets())?)
	}

	fn handle_get_entry(&self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let p: IdParams = parse_params(params)?;
		let snapshot = self.snapshot.load();
		Ok(json!({ "entry": snapshot.get(&p.id) }))
	}

	fn handle_recommend(&self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let p: RecommendParams = parse_params(params)?;
		let limit = positive(p.limit, self.config.recommend_limit, "limit")?;
		let snapshot = self.snapshot.load();
		let Some(anchor) = snapshot.get(&p.id) else {
			return Ok(json!({ "anchor": null, "recommendations": [] }));
		};
		let recommendations: Vec<Recommendation> = recommend_scored(anchor, snapshot.entries(), limit)
			.into_iter()
			.map(|r| Recommendation {
				entry: r.entry.summary(),
				score: r.score,
			})
			.collect();
		Ok(json!({
			"anchor": anchor.summary(),
			"recommendations": recommendations,
		}))
	}

	fn handle_similarity(&self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let p: PairParams = parse_params(params)?;
		let snapshot = self.snapshot.load();
		match (snapshot.get(&p.a), snapshot.get(&p.b)) {
			(Some(a), Some(b)) => {
				let breakdown = similarity_breakdown(a, b);
				Ok(json!({ "score": breakdown.total(), "breakdown": breakdown }))
			}
			_ => Ok(serde_json::Value::Null),
		}
	}

	fn handle_shelves(&self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let p: ShelvesParams = parse_params(params)?;
		let per_shelf = positive(p.per_shelf, self.config.shelf_size, "perShelf")?;
		let snapshot = self.snapshot.load();
		let mut shelves = mood_shelves(snapshot.entries(), &default_shelves(), per_shelf);
		for shelf in &mut shelves {
			shelf.entries = summaries(&shelf.entries);
		}
		Ok(json!({ "shelves": shelves }))
	}

	// ── Writes ────────────────────────────────────────────────────────────

	fn handle_create(&mut self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let raw: RawStoryRecord = parse_params(params)?;
		let entry = self.storage.create_entry(raw)?;
		self.snapshot.refresh_from(&self.storage)?;
		Ok(json!({ "entry": entry }))
	}

	fn handle_import(&mut self, params: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
		let p: ImportParams = parse_params(params)?;
		let (imported, failed) = import_into(&mut self.storage, Path::new(&p.dir))?;
		self.snapshot.refresh_from(&self.storage)?;
		Ok(json!({ "imported": imported, "failed": failed }))
	}
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Import every story file in `dir` into `storage`. Returns how many were
/// stored and which files were rejected.
pub fn import_into(
	storage: &mut dyn CatalogStorage,
	dir: &Path,
) -> Result<(usize, Vec<ImportFailure>), CatalogError> {
	let report = import_dir(dir)?;
	let mut imported = 0;
	for story in report.stories {
		let entry = storage.create_entry(story.record)?;
		tracing::debug!(file = %story.file, id = %entry.id, "imported story");
		imported += 1;
	}
	Ok((imported, report.failures))
}

fn summaries(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
	entries.iter().map(CatalogEntry::summary).collect()
}

fn positive(value: Option<usize>, default: usize, name: &str) -> Result<usize, CatalogError> {
	match value {
		Some(0) => Err(CatalogError::InvalidArgument(format!("{name} must be positive"))),
		Some(v) => Ok(v),
		None => Ok(default),
	}
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, CatalogError> {
	let params = if params.is_null() { json!({}) } else { params };
	serde_json::from_value(params)
		.map_err(|e| CatalogError::InvalidArgument(format!("Invalid params: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdParams {
	id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendParams {
	id: String,
	limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairParams {
	a: String,
	b: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShelvesParams {
	per_shelf: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportParams {
	dir: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
