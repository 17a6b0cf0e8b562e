use std::path::{Path, PathBuf};

use tracing::debug;

use stockwise_core::ProductRecord;

use crate::error::CatalogError;
use crate::provider::{CatalogProvider, validate_all};

/// Catalog stored as a JSON array of product records on disk.
///
/// Expected shape per element:
/// `{ "name": str, "stock": num, "average_weekly_sales": num, "lead_time": num }`.
/// Numeric fields may be missing or `null`; other fields are ignored.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogProvider for JsonFileCatalog {
    fn fetch(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let bytes = std::fs::read(&self.path)?;
        let records: Vec<ProductRecord> = serde_json::from_slice(&bytes)?;
        validate_all(&records)?;
        debug!(path = %self.path.display(), records = records.len(), "catalog loaded");
        Ok(records)
    }
}
