// ---------------------------------------------------------------------------
// Facet Index Builder — distinct franchises and moods for the filter widgets
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::collation::locale_cmp;
use crate::types::{CatalogEntry, Facets, FranchiseFacet};

/// Derive the selectable franchise and mood facets from a collection.
///
/// Franchises are grouped by `franchise_key`; the label is the raw
/// franchise string of the first entry seen with that key, so the result
/// depends on input order. Moods are de-duplicated by exact string.
/// Both lists come back in locale order.
pub fn build_facets(entries: &[CatalogEntry]) -> Facets {
	Facets {
		franchises: franchise_facets(entries),
		moods: mood_facets(entries),
	}
}

fn franchise_facets(entries: &[CatalogEntry]) -> Vec<FranchiseFacet> {
	let mut seen: HashSet<&str> = HashSet::new();
	let mut facets: Vec<FranchiseFacet> = entries
		.iter()
		.filter(|e| e.has_franchise())
		.filter(|e| seen.insert(e.franchise_key.as_str()))
		.map(|e| FranchiseFacet {
			key: e.franchise_key.clone(),
			label: e.franchise.clone(),
		})
		.collect();
	facets.sort_by(|a, b| locale_cmp(&a.label, &b.label));
	facets
}

fn mood_facets(entries: &[CatalogEntry]) -> Vec<String> {
	let mut seen: HashSet<&str> = HashSet::new();
	let mut moods: Vec<String> = entries
		.iter()
		.flat_map(|e| e.mood_categories.iter())
		.map(|m| m.trim())
		.filter(|m| !m.is_empty() && seen.insert(*m))
		.map(str::to_string)
		.collect();
	moods.sort_by(|a, b| locale_cmp(a, b));
	moods
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
