use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Invalid story format: {0}")]
	InvalidFormat(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl CatalogError {
	pub fn code(&self) -> &str {
		match self {
			Self::InvalidArgument(_) => "CATALOG_INVALID_ARGUMENT",
			Self::InvalidFormat(_) => "CATALOG_INVALID_FORMAT",
			Self::Io(_) => "CATALOG_IO",
			Self::Json(_) => "CATALOG_JSON",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"catalogCode": self.code(),
			"message": self.to_string(),
		})
	}
}
