use std::sync::Mutex;

use stockwise_core::ProductRecord;

use crate::error::CatalogError;
use crate::provider::{CatalogProvider, validate_all};

/// In-memory catalog for tests/dev.
///
/// Can be switched into a failing mode to simulate an unreachable source.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    records: Mutex<Vec<ProductRecord>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryCatalog {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            failure: Mutex::new(None),
        }
    }

    /// A catalog whose every fetch fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        let catalog = Self::default();
        catalog.fail_with(reason);
        catalog
    }

    pub fn replace(&self, records: Vec<ProductRecord>) {
        *self.records.lock().unwrap_or_else(|e| e.into_inner()) = records;
    }

    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.into());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn fetch(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        if let Some(reason) = self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(CatalogError::Unavailable(reason));
        }
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner()).clone();
        validate_all(&records)?;
        Ok(records)
    }
}
