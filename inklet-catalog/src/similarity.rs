// ---------------------------------------------------------------------------
// Similarity Engine — pairwise story scores and "you may also like" lists
// ---------------------------------------------------------------------------
//
// Additive score over fixed-weight factors plus a linear recency decay.
// Pure functions; every factor is symmetric in the pair.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::types::{CatalogEntry, Recommendation, SimilarityBreakdown};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const FRANCHISE_WEIGHT: f64 = 50.0;
pub const MOOD_WEIGHT: f64 = 8.0;
pub const TAG_WEIGHT: f64 = 6.0;
pub const LENGTH_WEIGHT: f64 = 4.0;
pub const ADULT_WEIGHT: f64 = 3.0;

/// Recency bonus for two stories created at the same instant.
pub const RECENCY_MAX: f64 = 8.0;

/// Days per point of recency decay; the bonus hits zero at 240 days.
pub const RECENCY_DECAY_DAYS: f64 = 30.0;

/// Default size of a recommendation row.
pub const DEFAULT_RECOMMEND_LIMIT: usize = 12;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

// ---------------------------------------------------------------------------
// Individual factors
// ---------------------------------------------------------------------------

fn overlap(a: &[String], b: &[String]) -> usize {
	let left: HashSet<&str> = a.iter().map(String::as_str).collect();
	let right: HashSet<&str> = b.iter().map(String::as_str).collect();
	left.intersection(&right).count()
}

/// Linear decay from [`RECENCY_MAX`] at zero distance to 0 at 240 days.
/// Never negative.
pub fn recency_bonus(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
	let delta_days = (a - b).num_milliseconds().unsigned_abs() as f64 / MS_PER_DAY;
	(RECENCY_MAX - (delta_days / RECENCY_DECAY_DAYS).min(RECENCY_MAX)).max(0.0)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Per-factor contributions for the pair `(a, b)`.
pub fn similarity_breakdown(a: &CatalogEntry, b: &CatalogEntry) -> SimilarityBreakdown {
	let same_franchise = a.has_franchise() && a.franchise_key == b.franchise_key;
	SimilarityBreakdown {
		franchise: if same_franchise { FRANCHISE_WEIGHT } else { 0.0 },
		mood: overlap(&a.mood_categories, &b.mood_categories) as f64 * MOOD_WEIGHT,
		tag: overlap(&a.tags, &b.tags) as f64 * TAG_WEIGHT,
		length: if a.length == b.length { LENGTH_WEIGHT } else { 0.0 },
		adult: if a.is_adult == b.is_adult { ADULT_WEIGHT } else { 0.0 },
		recency: recency_bonus(a.created_at, b.created_at),
	}
}

pub fn score_similarity(a: &CatalogEntry, b: &CatalogEntry) -> f64 {
	similarity_breakdown(a, b).total()
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Score every candidate except the anchor itself and return the best
/// `limit`, highest first. Exact ties keep candidate order.
pub fn recommend_scored(
	anchor: &CatalogEntry,
	candidates: &[CatalogEntry],
	limit: usize,
) -> Vec<Recommendation> {
	let mut scored: Vec<Recommendation> = candidates
		.iter()
		.filter(|c| c.id != anchor.id)
		.map(|c| Recommendation {
			entry: c.clone(),
			score: score_similarity(anchor, c),
		})
		.collect();
	scored.sort_by(|x, y| y.score.total_cmp(&x.score));
	scored.truncate(limit);
	scored
}

pub fn recommend(anchor: &CatalogEntry, candidates: &[CatalogEntry], limit: usize) -> Vec<CatalogEntry> {
	recommend_scored(anchor, candidates, limit)
		.into_iter()
		.map(|r| r.entry)
		.collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
