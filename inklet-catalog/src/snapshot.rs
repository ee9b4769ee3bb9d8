// ---------------------------------------------------------------------------
// Catalog snapshots — immutable entries + facets behind one swappable Arc
// ---------------------------------------------------------------------------
//
// A refresh builds the next snapshot off to the side and publishes it with
// a single reference swap. Readers hold an `Arc` to whichever snapshot was
// current when they loaded it and never see a half-built one.
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::CatalogError;
use crate::facets::build_facets;
use crate::storage::CatalogStorage;
use crate::types::{CatalogEntry, Facets};

#[derive(Debug, Default)]
pub struct CatalogSnapshot {
	entries: Vec<CatalogEntry>,
	facets: Facets,
	by_id: HashMap<String, usize>,
}

impl CatalogSnapshot {
	pub fn build(entries: Vec<CatalogEntry>) -> Self {
		let facets = build_facets(&entries);
		let mut by_id = HashMap::with_capacity(entries.len());
		for (i, entry) in entries.iter().enumerate() {
			by_id.entry(entry.id.clone()).or_insert(i);
		}
		Self {
			entries,
			facets,
			by_id,
		}
	}

	pub fn entries(&self) -> &[CatalogEntry] {
		&self.entries
	}

	pub fn facets(&self) -> &Facets {
		&self.facets
	}

	pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
		self.by_id.get(id).map(|&i| &self.entries[i])
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Holder for the current snapshot.
#[derive(Debug, Default)]
pub struct SnapshotCell {
	current: RwLock<Arc<CatalogSnapshot>>,
}

impl SnapshotCell {
	pub fn new(snapshot: CatalogSnapshot) -> Self {
		Self {
			current: RwLock::new(Arc::new(snapshot)),
		}
	}

	pub fn load(&self) -> Arc<CatalogSnapshot> {
		let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
		Arc::clone(&guard)
	}

	pub fn publish(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
		let next = Arc::new(snapshot);
		let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
		*guard = Arc::clone(&next);
		next
	}

	/// Rebuild from `storage` and publish.
	pub fn refresh_from(&self, storage: &dyn CatalogStorage) -> Result<Arc<CatalogSnapshot>, CatalogError> {
		let snapshot = CatalogSnapshot::build(storage.list_entries()?);
		tracing::info!(
			entries = snapshot.len(),
			franchises = snapshot.facets().franchises.len(),
			moods = snapshot.facets().moods.len(),
			"catalog snapshot published"
		);
		Ok(self.publish(snapshot))
	}
}
