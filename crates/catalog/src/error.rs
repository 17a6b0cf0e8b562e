use thiserror::Error;

use stockwise_core::DomainError;

/// Failure to obtain the catalog.
///
/// Every variant is terminal for the session that asked for the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog payload is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog record {index} rejected: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: DomainError,
    },

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
