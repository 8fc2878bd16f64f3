use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read station catalog '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse station catalog JSON")]
    JsonParse(#[from] serde_json::Error),
}
