pub mod collation;
pub mod config;
pub mod error;
pub mod facets;
pub mod import;
pub mod normalizer;
pub mod protocol;
pub mod query;
pub mod server;
pub mod shelves;
pub mod similarity;
pub mod snapshot;
pub mod storage;
pub mod transport;
pub mod types;
