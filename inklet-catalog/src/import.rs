// ---------------------------------------------------------------------------
// Story file import — header/body text files into raw story records
// ---------------------------------------------------------------------------
//
// File layout:
//
//   IS_ADULT: true|false
//   TITLE: ...
//   FRANCHISE: ...
//   CHARACTER_TAGS: name, name, ...
//   MOOD_CATEGORIES: mood, mood, ...
//   SYNOPSIS:
//   <one or more lines>
//   STORY:
//   <body>
//
// Missing header lines degrade to empty values. A missing or misordered
// SYNOPSIS:/STORY: marker rejects the whole file.
// ---------------------------------------------------------------------------

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::CatalogError;
use crate::normalizer::split_list;
use crate::types::RawStoryRecord;

const SYNOPSIS_MARKER: &str = "SYNOPSIS:";
const STORY_MARKER: &str = "STORY:";
const FILE_PREFIX: &str = "story-";
const FILE_SUFFIX: &str = ".txt";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ImportedStory {
	pub file: String,
	pub record: RawStoryRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
	pub file: String,
	pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
	pub stories: Vec<ImportedStory>,
	pub failures: Vec<ImportFailure>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn header_value<'a>(lines: &[&'a str], prefix: &str) -> &'a str {
	lines
		.iter()
		.copied()
		.find_map(|line| line.strip_prefix(prefix))
		.map(str::trim)
		.unwrap_or("")
}

fn marker_index(lines: &[&str], marker: &str) -> Option<usize> {
	lines.iter().position(|line| line.trim() == marker)
}

/// Parse one story file.
pub fn parse_story_file(text: &str) -> Result<RawStoryRecord, CatalogError> {
	let lines: Vec<&str> = text
		.split('\n')
		.map(|line| line.strip_suffix('\r').unwrap_or(line))
		.collect();

	let synopsis_at = marker_index(&lines, SYNOPSIS_MARKER)
		.ok_or_else(|| CatalogError::InvalidFormat("missing SYNOPSIS: block".into()))?;
	let story_at = marker_index(&lines, STORY_MARKER)
		.ok_or_else(|| CatalogError::InvalidFormat("missing STORY: block".into()))?;
	if story_at <= synopsis_at {
		return Err(CatalogError::InvalidFormat(
			"STORY: must come after SYNOPSIS:".into(),
		));
	}

	let synopsis = lines[synopsis_at + 1..story_at].join("\n").trim().to_string();
	let content = lines[story_at + 1..].join("\n").trim().to_string();

	Ok(RawStoryRecord {
		title: header_value(&lines, "TITLE:").to_string(),
		franchise: header_value(&lines, "FRANCHISE:").to_string(),
		character_tags: header_value(&lines, "CHARACTER_TAGS:").to_string(),
		mood_categories: split_list(header_value(&lines, "MOOD_CATEGORIES:")),
		synopsis,
		content,
		is_adult: header_value(&lines, "IS_ADULT:")
			.to_lowercase()
			.contains("true"),
		..Default::default()
	})
}

// ---------------------------------------------------------------------------
// Directory import
// ---------------------------------------------------------------------------

fn is_story_file(name: &str) -> bool {
	name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}

/// Parse every `story-*.txt` in `dir`, in filename order. Bad files are
/// reported and skipped; only an unreadable directory fails the call.
pub fn import_dir(dir: &Path) -> Result<ImportReport, CatalogError> {
	let mut names: Vec<String> = fs::read_dir(dir)?
		.filter_map(|entry| entry.ok())
		.filter(|entry| entry.path().is_file())
		.filter_map(|entry| entry.file_name().into_string().ok())
		.filter(|name| is_story_file(name))
		.collect();
	names.sort();

	tracing::info!(dir = %dir.display(), files = names.len(), "importing story files");

	let mut report = ImportReport::default();
	for name in names {
		let parsed = fs::read_to_string(dir.join(&name))
			.map_err(CatalogError::from)
			.and_then(|text| parse_story_file(&text));
		match parsed {
			Ok(record) => report.stories.push(ImportedStory { file: name, record }),
			Err(e) => {
				tracing::warn!(file = %name, error = %e, "skipping story file");
				report.failures.push(ImportFailure {
					file: name,
					message: e.to_string(),
				});
			}
		}
	}

	tracing::info!(
		imported = report.stories.len(),
		failed = report.failures.len(),
		"story import finished"
	);
	Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "IS_ADULT: false\r\n\
TITLE: The Long Way Home\r\n\
FRANCHISE: Fullmetal Alchemist\r\n\
CHARACTER_TAGS: Edward Elric, Alphonse Elric, \r\n\
MOOD_CATEGORIES: healing, found family,\r\n\
SYNOPSIS:\r\n\
Two brothers walk back.\r\n\
It rains.\r\n\
\r\n\
STORY:\r\n\
The road was long.\r\n\
\r\n\
They kept walking.\r\n";

	#[test]
	fn parses_headers_and_blocks() {
		let record = parse_story_file(SAMPLE).unwrap();
		assert!(!record.is_adult);
		assert_eq!(record.title, "The Long Way Home");
		assert_eq!(record.franchise, "Fullmetal Alchemist");
		assert_eq!(record.character_tags, "Edward Elric, Alphonse Elric,");
		assert_eq!(record.mood_categories, vec!["healing", "found family"]);
		assert_eq!(record.synopsis, "Two brothers walk back.\nIt rains.");
		assert_eq!(record.content, "The road was long.\n\nThey kept walking.");
		assert_eq!(record.id, None);
	}

	#[test]
	fn adult_flag_is_substring_match() {
		let text = "IS_ADULT: TRUE (mature)\nSYNOPSIS:\ns\nSTORY:\nbody";
		assert!(parse_story_file(text).unwrap().is_adult);
	}

	#[test]
	fn missing_headers_degrade_to_empty() {
		let record = parse_story_file("SYNOPSIS:\nSTORY:\n").unwrap();
		assert_eq!(record.title, "");
		assert_eq!(record.franchise, "");
		assert!(record.mood_categories.is_empty());
		assert_eq!(record.synopsis, "");
		assert_eq!(record.content, "");
	}

	#[test]
	fn missing_story_marker_is_rejected() {
		let err = parse_story_file("TITLE: x\nSYNOPSIS:\nsomething").unwrap_err();
		assert!(matches!(err, CatalogError::InvalidFormat(_)));
	}

	#[test]
	fn missing_synopsis_marker_is_rejected() {
		let err = parse_story_file("TITLE: x\nSTORY:\nbody").unwrap_err();
		assert!(matches!(err, CatalogError::InvalidFormat(_)));
	}

	#[test]
	fn story_before_synopsis_is_rejected() {
		let err = parse_story_file("STORY:\nbody\nSYNOPSIS:\nsyn").unwrap_err();
		assert!(matches!(err, CatalogError::InvalidFormat(_)));
	}

	#[test]
	fn import_dir_reads_story_files_in_order() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("story-002.txt"), "TITLE: Second\nSYNOPSIS:\nSTORY:\nb").unwrap();
		fs::write(dir.path().join("story-001.txt"), "TITLE: First\nSYNOPSIS:\nSTORY:\na").unwrap();
		fs::write(dir.path().join("story-003.txt"), "TITLE: Broken\nSTORY:\nc").unwrap();
		fs::write(dir.path().join("notes.txt"), "not a story").unwrap();

		let report = import_dir(dir.path()).unwrap();
		let titles: Vec<&str> = report.stories.iter().map(|s| s.record.title.as_str()).collect();
		assert_eq!(titles, vec!["First", "Second"]);
		assert_eq!(report.failures.len(), 1);
		assert_eq!(report.failures[0].file, "story-003.txt");
	}

	#[test]
	fn import_dir_missing_directory_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = import_dir(&dir.path().join("nope")).unwrap_err();
		assert!(matches!(err, CatalogError::Io(_)));
	}
}
