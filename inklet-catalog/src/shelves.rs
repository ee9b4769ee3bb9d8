// ---------------------------------------------------------------------------
// Mood shelves — themed rows for the home feed
// ---------------------------------------------------------------------------

use serde::Serialize;

use crate::query::SortOrder;
use crate::types::CatalogEntry;

/// Default number of entries per shelf.
pub const DEFAULT_SHELF_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodShelf {
	pub id: String,
	pub label: String,
	pub description: String,
	pub moods: Vec<String>,
}

impl MoodShelf {
	fn new(id: &str, label: &str, description: &str, moods: &[&str]) -> Self {
		Self {
			id: id.to_string(),
			label: label.to_string(),
			description: description.to_string(),
			moods: moods.iter().map(|m| m.to_string()).collect(),
		}
	}

	/// An entry is on the shelf when any of its moods matches any shelf
	/// mood, ignoring case and surrounding whitespace.
	pub fn holds(&self, entry: &CatalogEntry) -> bool {
		let wanted: Vec<String> = self.moods.iter().map(|m| m.to_lowercase()).collect();
		entry
			.mood_categories
			.iter()
			.map(|m| m.trim().to_lowercase())
			.any(|m| wanted.contains(&m))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelfView {
	pub id: String,
	pub label: String,
	pub description: String,
	pub entries: Vec<CatalogEntry>,
}

pub fn default_shelves() -> Vec<MoodShelf> {
	vec![
		MoodShelf::new(
			"healing",
			"Healing & Second Chances",
			"What if things didn't have to end in tragedy?",
			&["healing", "second chance", "forgiveness", "closure"],
		),
		MoodShelf::new(
			"comfort",
			"Comfort & Found Family",
			"Soft landings, warm bonds, and chosen family.",
			&["comfort", "found family", "warmth", "support"],
		),
		MoodShelf::new(
			"angst",
			"Angst & Emotional Catharsis",
			"Stories that hurt just enough to help you let go.",
			&["angst", "grief", "loss", "catharsis"],
		),
		MoodShelf::new(
			"romance",
			"Slow Burn & Romance",
			"Careful confessions, stolen glances, and soft hands.",
			&["romance", "slow burn", "tender", "bittersweet"],
		),
		MoodShelf::new(
			"rebellion",
			"Rebellion & Hope",
			"When the world is broken and they decide to fix it.",
			&["hope", "rebellion", "bravery", "defiance"],
		),
	]
}

/// Fill each shelf with its newest `per_shelf` entries. Empty shelves are
/// dropped; shelf order is preserved.
pub fn mood_shelves(entries: &[CatalogEntry], shelves: &[MoodShelf], per_shelf: usize) -> Vec<ShelfView> {
	shelves
		.iter()
		.filter_map(|shelf| {
			let mut rows: Vec<CatalogEntry> = entries.iter().filter(|e| shelf.holds(e)).cloned().collect();
			if rows.is_empty() {
				return None;
			}
			rows.sort_by(|a, b| SortOrder::Newest.compare(a, b));
			rows.truncate(per_shelf);
			Some(ShelfView {
				id: shelf.id.clone(),
				label: shelf.label.clone(),
				description: shelf.description.clone(),
				entries: rows,
			})
		})
		.collect()
}
