use clap::Parser;

use crate::shelves::DEFAULT_SHELF_SIZE;
use crate::similarity::DEFAULT_RECOMMEND_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "inklet-catalog-engine", about = "Story catalog engine over JSON-RPC 2.0 / NDJSON stdio")]
pub struct CliArgs {
	/// Directory of story-*.txt files to import at startup
	#[arg(long, env = "INKLET_STORIES_DIR")]
	pub stories_dir: Option<String>,

	/// Default number of recommendations per request
	#[arg(long, default_value_t = DEFAULT_RECOMMEND_LIMIT, env = "INKLET_RECOMMEND_LIMIT")]
	pub recommend_limit: usize,

	/// Default number of entries per mood shelf
	#[arg(long, default_value_t = DEFAULT_SHELF_SIZE, env = "INKLET_SHELF_SIZE")]
	pub shelf_size: usize,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "INKLET_LOG_LEVEL")]
	pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
	pub recommend_limit: usize,
	pub shelf_size: usize,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			recommend_limit: DEFAULT_RECOMMEND_LIMIT,
			shelf_size: DEFAULT_SHELF_SIZE,
		}
	}
}

impl From<&CliArgs> for ServerConfig {
	fn from(args: &CliArgs) -> Self {
		Self {
			recommend_limit: args.recommend_limit,
			shelf_size: args.shelf_size,
		}
	}
}
