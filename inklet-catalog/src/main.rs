use std::path::Path;

use clap::Parser;
use inklet_catalog_engine::config::{CliArgs, ServerConfig};
use inklet_catalog_engine::server::{import_into, CatalogServer};
use inklet_catalog_engine::storage::MemoryStorage;
use inklet_catalog_engine::transport::NdjsonTransport;

fn main() {
	let args = CliArgs::parse();

	// stdout carries the protocol; logs go to stderr
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let mut storage = MemoryStorage::new();
	if let Some(dir) = &args.stories_dir {
		match import_into(&mut storage, Path::new(dir)) {
			Ok((imported, failed)) => {
				tracing::info!(dir = %dir, imported, failed = failed.len(), "startup import done");
			}
			Err(e) => {
				tracing::error!("Startup import failed: {}", e);
				std::process::exit(1);
			}
		}
	}

	let transport = NdjsonTransport::stdout();
	let mut server = match CatalogServer::new(transport, storage, ServerConfig::from(&args)) {
		Ok(server) => server,
		Err(e) => {
			tracing::error!("Server init error: {}", e);
			std::process::exit(1);
		}
	};

	tracing::info!("inklet-catalog-engine ready");

	if let Err(e) = server.run() {
		tracing::error!("Server error: {}", e);
		std::process::exit(1);
	}
}
