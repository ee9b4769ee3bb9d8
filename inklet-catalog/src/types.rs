use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Story metadata
// ---------------------------------------------------------------------------

/// Length bucket derived from the body word count at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryLength {
	Short,
	Medium,
	Long,
}

impl StoryLength {
	/// Sort weight used by the length-first orderings.
	pub fn weight(self) -> u8 {
		match self {
			Self::Short => 1,
			Self::Medium => 2,
			Self::Long => 3,
		}
	}
}

/// Coarse genre bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	Anime,
	Tv,
	Books,
	Film,
}

/// A story record as it arrives from submission or the file importer,
/// before any canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStoryRecord {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub franchise: String,
	/// Comma-separated character names.
	#[serde(rename = "characterTags", default)]
	pub character_tags: String,
	#[serde(rename = "moodCategories", default)]
	pub mood_categories: Vec<String>,
	#[serde(default)]
	pub synopsis: String,
	#[serde(default)]
	pub content: String,
	#[serde(rename = "isAdult", default)]
	pub is_adult: bool,
	/// Explicit category; takes precedence over keyword inference.
	#[serde(default)]
	pub category: Option<Category>,
	#[serde(default)]
	pub upvotes: u64,
	#[serde(rename = "createdAt", default)]
	pub created_at: Option<DateTime<Utc>>,
}

/// Canonical, immutable representation of one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
	pub id: String,
	pub title: String,
	pub franchise: String,
	#[serde(rename = "franchiseKey")]
	pub franchise_key: String,
	pub category: Option<Category>,
	#[serde(rename = "isAdult")]
	pub is_adult: bool,
	pub length: StoryLength,
	pub tags: Vec<String>,
	#[serde(rename = "moodCategories")]
	pub mood_categories: Vec<String>,
	pub synopsis: String,
	pub upvotes: u64,
	#[serde(rename = "createdAt")]
	pub created_at: DateTime<Utc>,
	/// Full body; only present on detail loads.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
}

impl CatalogEntry {
	/// List-view copy of the entry, without the body.
	pub fn summary(&self) -> CatalogEntry {
		CatalogEntry {
			content: None,
			..self.clone()
		}
	}

	pub fn has_franchise(&self) -> bool {
		!self.franchise_key.is_empty()
	}
}

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchiseFacet {
	pub key: String,
	pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
	pub franchises: Vec<FranchiseFacet>,
	pub moods: Vec<String>,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Per-factor contributions to a similarity score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
	pub franchise: f64,
	pub mood: f64,
	pub tag: f64,
	pub length: f64,
	pub adult: f64,
	pub recency: f64,
}

impl SimilarityBreakdown {
	pub fn total(&self) -> f64 {
		self.franchise + self.mood + self.tag + self.length + self.adult + self.recency
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
	pub entry: CatalogEntry,
	pub score: f64,
}
