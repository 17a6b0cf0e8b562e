use tracing::debug;

use stockwise_core::ProductRecord;

use crate::error::CatalogError;

/// Supplier of the product catalog (fetch-like, all-or-nothing).
///
/// Implementations are storage-agnostic from the pipeline's point of view: a
/// file, an HTTP client or a fixture. Records are returned in catalog order.
pub trait CatalogProvider: Send + Sync {
    fn fetch(&self) -> Result<Vec<ProductRecord>, CatalogError>;
}

impl<P: CatalogProvider + ?Sized> CatalogProvider for &P {
    fn fetch(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        (**self).fetch()
    }
}

impl<P: CatalogProvider + ?Sized> CatalogProvider for std::sync::Arc<P> {
    fn fetch(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        (**self).fetch()
    }
}

/// Validate every record, failing on the first bad one.
pub(crate) fn validate_all(records: &[ProductRecord]) -> Result<(), CatalogError> {
    for (index, record) in records.iter().enumerate() {
        if let Err(source) = record.validate() {
            debug!(index, name = %record.name, error = %source, "catalog record rejected");
            return Err(CatalogError::InvalidRecord { index, source });
        }
    }
    Ok(())
}
