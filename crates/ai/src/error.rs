use thiserror::Error;

use stockwise_catalog::CatalogError;

use crate::session::RunPhase;

/// Errors surfaced at the prediction-run boundary.
///
/// An empty catalog is not an error (the run is a no-op), and missing numeric
/// fields are silently read as zero.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AiError {
    /// The catalog could not be fetched. Terminal for the session: no partial
    /// catalog is kept.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Pipeline configuration was rejected before any work started.
    #[error("invalid pipeline input: {0}")]
    InvalidInput(String),

    /// Model construction or fitting failed. Transient buffers have already
    /// been released when this is returned.
    #[error("training failed: {0}")]
    TrainingFailed(String),

    /// A run was requested while another one is active.
    #[error("a prediction run is already in progress (phase: {0})")]
    RunInProgress(RunPhase),

    /// The caller cancelled the run; no partial results are returned.
    #[error("prediction run cancelled")]
    Cancelled,
}

impl From<CatalogError> for AiError {
    fn from(err: CatalogError) -> Self {
        AiError::CatalogUnavailable(err.to_string())
    }
}
