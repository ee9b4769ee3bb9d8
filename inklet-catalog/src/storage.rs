// ---------------------------------------------------------------------------
// Storage seam — where catalog entries come from
// ---------------------------------------------------------------------------
//
// The engine only lists, looks up and creates entries. Durable backends
// implement `CatalogStorage`; `MemoryStorage` backs the stdio server and
// the tests.
// ---------------------------------------------------------------------------

use chrono::Utc;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::normalizer::normalize;
use crate::types::{CatalogEntry, RawStoryRecord};

pub trait CatalogStorage {
	fn list_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError>;

	/// `Ok(None)` is the ordinary "no such id" outcome.
	fn get_entry(&self, id: &str) -> Result<Option<CatalogEntry>, CatalogError>;

	fn create_entry(&mut self, raw: RawStoryRecord) -> Result<CatalogEntry, CatalogError>;
}

/// In-memory storage over a persistent vector; cloning the list for a
/// snapshot shares structure with the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	entries: im::Vector<CatalogEntry>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
		Self {
			entries: entries.into_iter().collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl CatalogStorage for MemoryStorage {
	fn list_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
		Ok(self.entries.iter().cloned().collect())
	}

	fn get_entry(&self, id: &str) -> Result<Option<CatalogEntry>, CatalogError> {
		Ok(self.entries.iter().find(|e| e.id == id).cloned())
	}

	/// Assigns an id and creation time when the record has none, then
	/// normalizes and stores it. A supplied id must not already be stored.
	fn create_entry(&mut self, mut raw: RawStoryRecord) -> Result<CatalogEntry, CatalogError> {
		match raw.id.as_deref() {
			None | Some("") => raw.id = Some(Uuid::new_v4().to_string()),
			Some(id) if self.entries.iter().any(|e| e.id == id) => {
				return Err(CatalogError::InvalidArgument(format!("duplicate id: {id}")));
			}
			Some(_) => {}
		}
		if raw.created_at.is_none() {
			raw.created_at = Some(Utc::now());
		}
		let entry = normalize(&raw);
		tracing::debug!(id = %entry.id, franchise = %entry.franchise, "entry created");
		self.entries.push_back(entry.clone());
		Ok(entry)
	}
}
