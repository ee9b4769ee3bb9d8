// ---------------------------------------------------------------------------
// Story Normalizer — raw story records into canonical catalog entries
// ---------------------------------------------------------------------------
//
// Pure functions. Missing optional fields degrade to empty values; nothing
// here can fail.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::types::{CatalogEntry, Category, RawStoryRecord, StoryLength};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Bodies with fewer words than this are `short`.
pub const SHORT_WORD_LIMIT: usize = 2500;

/// Bodies with fewer words than this (and not short) are `medium`.
pub const MEDIUM_WORD_LIMIT: usize = 4500;

const ANIME_KEYWORDS: &[&str] = &[
	"attack on titan",
	"jujutsu kaisen",
	"neon genesis evangelion",
	"fullmetal alchemist",
	"naruto",
	"inuyasha",
	"cowboy bebop",
	"toradora",
	"yuri!!! on ice",
	"clannad",
	"steins;gate",
];

const TV_KEYWORDS: &[&str] = &[
	"breaking bad",
	"the expanse",
	"firefly",
	"doctor who",
	"westworld",
	"the walking dead",
	"true detective",
	"battlestar galactica",
];

const BOOK_KEYWORDS: &[&str] = &[
	"stormlight archive",
	"mistborn",
	"the name of the wind",
	"wheel of time",
	"dark tower",
	"his dark materials",
	"ender's game",
];

const FILM_KEYWORDS: &[&str] = &["the matrix", "inception", "interstellar", "blade runner"];

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Canonical comparison form of a franchise name.
///
/// Lower-cases, folds U+2019 to `'`, collapses whitespace runs to a single
/// space and trims. Every franchise equality test goes through this.
pub fn franchise_key(franchise: &str) -> String {
	let folded = franchise.to_lowercase().replace('\u{2019}', "'");
	folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of non-empty whitespace-delimited tokens.
pub fn word_count(content: &str) -> usize {
	content.split_whitespace().count()
}

pub fn infer_length(content: &str) -> StoryLength {
	let words = word_count(content);
	if words < SHORT_WORD_LIMIT {
		StoryLength::Short
	} else if words < MEDIUM_WORD_LIMIT {
		StoryLength::Medium
	} else {
		StoryLength::Long
	}
}

/// Split a comma-separated list, trimming pieces and dropping empties.
pub fn split_list(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}

/// Character tags plus the franchise display string, de-duplicated by exact
/// equality with first occurrence kept.
pub fn derive_tags(character_tags: &str, franchise: &str) -> Vec<String> {
	let mut tags = split_list(character_tags);
	let franchise = franchise.trim();
	if !franchise.is_empty() {
		tags.push(franchise.to_string());
	}
	dedup_exact(tags)
}

/// Trim, drop empties, de-duplicate by exact equality. Case is kept as stored.
pub fn normalize_moods<S: AsRef<str>>(moods: &[S]) -> Vec<String> {
	let trimmed = moods
		.iter()
		.map(|m| m.as_ref().trim())
		.filter(|m| !m.is_empty())
		.map(str::to_string)
		.collect();
	dedup_exact(trimmed)
}

/// Best-effort genre guess from fixed keyword lists. First matching
/// category wins. Only case is folded; apostrophes and spacing must match
/// the keyword exactly.
pub fn infer_category(franchise: &str) -> Option<Category> {
	let lowered = franchise.to_lowercase();
	if lowered.trim().is_empty() {
		return None;
	}
	let lists: [(Category, &[&str]); 4] = [
		(Category::Anime, ANIME_KEYWORDS),
		(Category::Tv, TV_KEYWORDS),
		(Category::Books, BOOK_KEYWORDS),
		(Category::Film, FILM_KEYWORDS),
	];
	lists
		.into_iter()
		.find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
		.map(|(category, _)| category)
}

fn dedup_exact(items: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	items
		.into_iter()
		.filter(|item| seen.insert(item.clone()))
		.collect()
}

// ---------------------------------------------------------------------------
// Normalize
// ---------------------------------------------------------------------------

/// Build the canonical entry for one raw record.
///
/// A missing id becomes the empty string and a missing timestamp the Unix
/// epoch; callers that need real values assign them before normalizing.
pub fn normalize(raw: &RawStoryRecord) -> CatalogEntry {
	CatalogEntry {
		id: raw.id.clone().unwrap_or_default(),
		title: raw.title.clone(),
		franchise: raw.franchise.clone(),
		franchise_key: franchise_key(&raw.franchise),
		category: raw.category.or_else(|| infer_category(&raw.franchise)),
		is_adult: raw.is_adult,
		length: infer_length(&raw.content),
		tags: derive_tags(&raw.character_tags, &raw.franchise),
		mood_categories: normalize_moods(&raw.mood_categories),
		synopsis: raw.synopsis.clone(),
		upvotes: raw.upvotes,
		created_at: raw.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
		content: Some(raw.content.clone()),
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
