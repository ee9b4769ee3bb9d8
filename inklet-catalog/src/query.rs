// ---------------------------------------------------------------------------
// Catalog Query Engine — faceted filtering and deterministic ordering
// ---------------------------------------------------------------------------
//
// A query is one conjunctive filter pass followed by a stable sort. The
// engine keeps no state between calls.
// ---------------------------------------------------------------------------

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::normalizer::franchise_key;
use crate::types::CatalogEntry;

/// Sentinel accepted by the franchise and mood selectors.
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Spec types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdultVisibility {
	#[default]
	All,
	HideAdult,
	AdultOnly,
}

impl AdultVisibility {
	pub fn admits(self, is_adult: bool) -> bool {
		match self {
			Self::All => true,
			Self::HideAdult => !is_adult,
			Self::AdultOnly => is_adult,
		}
	}
}

impl FromStr for AdultVisibility {
	type Err = CatalogError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"all" => Ok(Self::All),
			"hideAdult" => Ok(Self::HideAdult),
			"adultOnly" => Ok(Self::AdultOnly),
			other => Err(CatalogError::InvalidArgument(format!(
				"unknown adultVisibility: {other}"
			))),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
	#[default]
	Newest,
	Oldest,
	LongFirst,
	ShortFirst,
}

impl SortOrder {
	/// Comparator for this order. Length orders fall back to newest first.
	pub fn compare(self, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
		let newest = || b.created_at.cmp(&a.created_at);
		match self {
			Self::Newest => newest(),
			Self::Oldest => a.created_at.cmp(&b.created_at),
			Self::LongFirst => b.length.weight().cmp(&a.length.weight()).then_with(newest),
			Self::ShortFirst => a.length.weight().cmp(&b.length.weight()).then_with(newest),
		}
	}
}

impl FromStr for SortOrder {
	type Err = CatalogError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"newest" => Ok(Self::Newest),
			"oldest" => Ok(Self::Oldest),
			"longFirst" => Ok(Self::LongFirst),
			"shortFirst" => Ok(Self::ShortFirst),
			other => Err(CatalogError::InvalidArgument(format!("unknown sortBy: {other}"))),
		}
	}
}

/// Franchise or mood selector: everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetFilter {
	#[default]
	All,
	Only(String),
}

impl From<&str> for FacetFilter {
	fn from(value: &str) -> Self {
		if value == ALL {
			Self::All
		} else {
			Self::Only(value.to_string())
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuerySpec {
	pub search_term: String,
	pub adult_visibility: AdultVisibility,
	/// Compared against `franchise_key`.
	pub franchise_filter: FacetFilter,
	pub mood_filter: FacetFilter,
	pub sort_by: SortOrder,
}

/// Wire form of a [`QuerySpec`]; enum fields stay strings until validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuerySpec {
	pub search_term: Option<String>,
	pub adult_visibility: Option<String>,
	pub franchise_filter: Option<String>,
	pub mood_filter: Option<String>,
	pub sort_by: Option<String>,
}

impl TryFrom<RawQuerySpec> for QuerySpec {
	type Error = CatalogError;

	fn try_from(raw: RawQuerySpec) -> Result<Self, Self::Error> {
		Ok(QuerySpec {
			search_term: raw.search_term.unwrap_or_default(),
			adult_visibility: raw
				.adult_visibility
				.as_deref()
				.map(str::parse::<AdultVisibility>)
				.transpose()?
				.unwrap_or_default(),
			franchise_filter: raw
				.franchise_filter
				.as_deref()
				.map(FacetFilter::from)
				.unwrap_or_default(),
			mood_filter: raw
				.mood_filter
				.as_deref()
				.map(FacetFilter::from)
				.unwrap_or_default(),
			sort_by: raw
				.sort_by
				.as_deref()
				.map(str::parse::<SortOrder>)
				.transpose()?
				.unwrap_or_default(),
		})
	}
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Query predicates in comparison form, computed once per call.
struct Matcher {
	term: String,
	adult_visibility: AdultVisibility,
	franchise_key: Option<String>,
	mood: Option<String>,
}

impl Matcher {
	fn new(spec: &QuerySpec) -> Self {
		Self {
			term: spec.search_term.trim().to_lowercase(),
			adult_visibility: spec.adult_visibility,
			franchise_key: match &spec.franchise_filter {
				FacetFilter::All => None,
				FacetFilter::Only(value) => Some(franchise_key(value)),
			},
			mood: match &spec.mood_filter {
				FacetFilter::All => None,
				FacetFilter::Only(value) => Some(value.trim().to_lowercase()),
			},
		}
	}

	fn matches(&self, entry: &CatalogEntry) -> bool {
		self.adult_visibility.admits(entry.is_adult)
			&& self.matches_franchise(entry)
			&& self.matches_mood(entry)
			&& self.matches_term(entry)
	}

	fn matches_franchise(&self, entry: &CatalogEntry) -> bool {
		match &self.franchise_key {
			None => true,
			Some(key) => entry.has_franchise() && entry.franchise_key == *key,
		}
	}

	fn matches_mood(&self, entry: &CatalogEntry) -> bool {
		match &self.mood {
			None => true,
			Some(mood) => entry
				.mood_categories
				.iter()
				.any(|m| m.to_lowercase() == *mood),
		}
	}

	fn matches_term(&self, entry: &CatalogEntry) -> bool {
		if self.term.is_empty() {
			return true;
		}
		let hit = |s: &str| s.to_lowercase().contains(&self.term);
		hit(&entry.title) || hit(&entry.franchise) || entry.tags.iter().any(|t| hit(t))
	}
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Filter `entries` by every active predicate in `spec`, then stable-sort
/// by `spec.sort_by`. Zero matches is an empty vec, not an error.
pub fn query(entries: &[CatalogEntry], spec: &QuerySpec) -> Vec<CatalogEntry> {
	let matcher = Matcher::new(spec);
	let mut result: Vec<CatalogEntry> = entries
		.iter()
		.filter(|e| matcher.matches(e))
		.cloned()
		.collect();
	result.sort_by(|a, b| spec.sort_by.compare(a, b));
	tracing::debug!(
		total = entries.len(),
		matched = result.len(),
		sort = ?spec.sort_by,
		"catalog query"
	);
	result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone, Utc};

	use crate::normalizer::normalize;
	use crate::types::{RawStoryRecord, StoryLength};

	fn entry(id: &str, franchise: &str, adult: bool, words: usize, day: i64) -> CatalogEntry {
		normalize(&RawStoryRecord {
			id: Some(id.into()),
			title: format!("Story {id}"),
			franchise: franchise.into(),
			character_tags: "Sakura, Kakashi".into(),
			mood_categories: vec!["Healing".into(), "hope".into()],
			content: vec!["w"; words].join(" "),
			is_adult: adult,
			created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)),
			..Default::default()
		})
	}

	fn ids(entries: &[CatalogEntry]) -> Vec<&str> {
		entries.iter().map(|e| e.id.as_str()).collect()
	}

	fn spec() -> QuerySpec {
		QuerySpec::default()
	}

	// -- parsing --------------------------------------------------------------

	#[test]
	fn raw_spec_defaults() {
		let parsed = QuerySpec::try_from(RawQuerySpec::default()).unwrap();
		assert_eq!(parsed, QuerySpec::default());
	}

	#[test]
	fn raw_spec_parses_enums() {
		let parsed = QuerySpec::try_from(RawQuerySpec {
			search_term: Some("sakura".into()),
			adult_visibility: Some("adultOnly".into()),
			franchise_filter: Some("naruto".into()),
			mood_filter: Some("all".into()),
			sort_by: Some("shortFirst".into()),
		})
		.unwrap();
		assert_eq!(parsed.adult_visibility, AdultVisibility::AdultOnly);
		assert_eq!(parsed.franchise_filter, FacetFilter::Only("naruto".into()));
		assert_eq!(parsed.mood_filter, FacetFilter::All);
		assert_eq!(parsed.sort_by, SortOrder::ShortFirst);
	}

	#[test]
	fn malformed_enums_fail_fast() {
		let err = QuerySpec::try_from(RawQuerySpec {
			sort_by: Some("sideways".into()),
			..Default::default()
		})
		.unwrap_err();
		assert!(matches!(err, CatalogError::InvalidArgument(_)));

		let err = QuerySpec::try_from(RawQuerySpec {
			adult_visibility: Some("hide".into()),
			..Default::default()
		})
		.unwrap_err();
		assert!(matches!(err, CatalogError::InvalidArgument(_)));
	}

	// -- filters --------------------------------------------------------------

	#[test]
	fn hide_adult_keeps_only_non_adult() {
		let entries = vec![
			entry("a", "Naruto", true, 10, 0),
			entry("b", "Naruto", false, 10, 1),
			entry("c", "Naruto", false, 10, 2),
		];
		let result = query(
			&entries,
			&QuerySpec {
				adult_visibility: AdultVisibility::HideAdult,
				..spec()
			},
		);
		assert_eq!(ids(&result), vec!["c", "b"]);
	}

	#[test]
	fn adult_only_keeps_only_adult() {
		let entries = vec![entry("a", "Naruto", true, 10, 0), entry("b", "Naruto", false, 10, 1)];
		let result = query(
			&entries,
			&QuerySpec {
				adult_visibility: AdultVisibility::AdultOnly,
				..spec()
			},
		);
		assert_eq!(ids(&result), vec!["a"]);
	}

	#[test]
	fn franchise_filter_uses_key() {
		let entries = vec![
			entry("a", "Grey\u{2019}s Anatomy", false, 10, 0),
			entry("b", "  grey's  anatomy", false, 10, 1),
			entry("c", "Naruto", false, 10, 2),
			entry("d", "", false, 10, 3),
		];
		let result = query(
			&entries,
			&QuerySpec {
				franchise_filter: FacetFilter::Only("grey's anatomy".into()),
				..spec()
			},
		);
		assert_eq!(ids(&result), vec!["b", "a"]);
	}

	#[test]
	fn blank_franchise_never_matches_specific_filter() {
		let entries = vec![entry("d", "", false, 10, 0)];
		let result = query(
			&entries,
			&QuerySpec {
				franchise_filter: FacetFilter::Only("".into()),
				..spec()
			},
		);
		assert!(result.is_empty());
	}

	#[test]
	fn mood_filter_is_case_insensitive_exact() {
		let entries = vec![entry("a", "Naruto", false, 10, 0)];
		let hit = query(
			&entries,
			&QuerySpec {
				mood_filter: FacetFilter::Only("HEALING".into()),
				..spec()
			},
		);
		assert_eq!(ids(&hit), vec!["a"]);

		let miss = query(
			&entries,
			&QuerySpec {
				mood_filter: FacetFilter::Only("heal".into()),
				..spec()
			},
		);
		assert!(miss.is_empty());
	}

	#[test]
	fn search_term_matches_title_franchise_and_tags() {
		let entries = vec![entry("a", "Naruto", false, 10, 0), entry("b", "Firefly", false, 10, 1)];
		let by_tag = query(
			&entries,
			&QuerySpec {
				search_term: "KAKA".into(),
				..spec()
			},
		);
		assert_eq!(ids(&by_tag), vec!["b", "a"]);

		let by_franchise = query(
			&entries,
			&QuerySpec {
				search_term: "fly".into(),
				..spec()
			},
		);
		assert_eq!(ids(&by_franchise), vec!["b"]);

		let by_title = query(
			&entries,
			&QuerySpec {
				search_term: "  story a ".into(),
				..spec()
			},
		);
		assert_eq!(ids(&by_title), vec!["a"]);
	}

	#[test]
	fn filters_are_conjunctive() {
		let entries = vec![
			entry("a", "Naruto", true, 10, 0),
			entry("b", "Naruto", false, 10, 1),
			entry("c", "Firefly", false, 10, 2),
		];
		let q = QuerySpec {
			search_term: "sakura".into(),
			adult_visibility: AdultVisibility::HideAdult,
			franchise_filter: FacetFilter::Only("naruto".into()),
			mood_filter: FacetFilter::Only("hope".into()),
			sort_by: SortOrder::Oldest,
		};
		let result = query(&entries, &q);
		assert_eq!(ids(&result), vec!["b"]);
		for e in &result {
			assert!(!e.is_adult);
			assert_eq!(e.franchise_key, "naruto");
		}
	}

	#[test]
	fn empty_input_and_no_matches_are_empty() {
		assert!(query(&[], &spec()).is_empty());
		let entries = vec![entry("a", "Naruto", false, 10, 0)];
		let none = query(
			&entries,
			&QuerySpec {
				search_term: "zzz".into(),
				..spec()
			},
		);
		assert!(none.is_empty());
	}

	// -- sorting --------------------------------------------------------------

	#[test]
	fn newest_and_oldest() {
		let entries = vec![
			entry("a", "Naruto", false, 10, 5),
			entry("b", "Naruto", false, 10, 1),
			entry("c", "Naruto", false, 10, 9),
		];
		assert_eq!(ids(&query(&entries, &spec())), vec!["c", "a", "b"]);
		let oldest = query(
			&entries,
			&QuerySpec {
				sort_by: SortOrder::Oldest,
				..spec()
			},
		);
		assert_eq!(ids(&oldest), vec!["b", "a", "c"]);
	}

	#[test]
	fn long_first_breaks_ties_by_newest_then_input_order() {
		let entries = vec![
			entry("s1", "Naruto", false, 100, 3),
			entry("l1", "Naruto", false, 5000, 1),
			entry("m1", "Naruto", false, 3000, 2),
			entry("l2", "Naruto", false, 4600, 4),
			entry("s2", "Naruto", false, 100, 3),
		];
		assert_eq!(entries[1].length, StoryLength::Long);
		let result = query(
			&entries,
			&QuerySpec {
				sort_by: SortOrder::LongFirst,
				..spec()
			},
		);
		assert_eq!(ids(&result), vec!["l2", "l1", "m1", "s1", "s2"]);
	}

	#[test]
	fn short_first_breaks_ties_by_newest() {
		let entries = vec![
			entry("l1", "Naruto", false, 5000, 1),
			entry("s1", "Naruto", false, 100, 1),
			entry("s2", "Naruto", false, 100, 7),
			entry("m1", "Naruto", false, 3000, 2),
		];
		let result = query(
			&entries,
			&QuerySpec {
				sort_by: SortOrder::ShortFirst,
				..spec()
			},
		);
		assert_eq!(ids(&result), vec!["s2", "s1", "m1", "l1"]);
	}

	#[test]
	fn query_never_mutates_input() {
		let entries = vec![entry("a", "Naruto", false, 10, 0), entry("b", "Naruto", false, 10, 1)];
		let before = entries.clone();
		let _ = query(&entries, &spec());
		assert_eq!(entries, before);
	}
}
