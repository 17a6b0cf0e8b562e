//! `stockwise-ai`
//!
//! **Responsibility:** the reorder-prediction pipeline.
//!
//! catalog → metric → label → dataset → trainer → inference → aggregated results.
//!
//! - It does not fetch data: a [`stockwise_catalog::CatalogProvider`] is handed in.
//! - It does not persist models: a [`ReorderModel`] lives for one session.
//! - It holds no process-wide state: everything hangs off a caller-owned
//!   [`PredictionSession`].

pub mod aggregate;
pub mod buffer;
pub mod cancel;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod label;
pub mod metric;
pub mod network;
pub mod result;
pub mod session;
pub mod trainer;

pub use aggregate::aggregate;
pub use buffer::{BufferTracker, ScopedBuffer};
pub use cancel::CancellationToken;
pub use config::{PipelineConfig, TrainingConfig};
pub use dataset::{Dataset, build_dataset, feature_row};
pub use error::AiError;
pub use inference::{DECISION_THRESHOLD, Prediction, predict};
pub use label::{Label, derive_label};
pub use metric::{DAYS_SENTINEL, ReorderRule, derive_metric};
pub use network::{HIDDEN_UNITS, INPUT_DIM, ReorderModel};
pub use result::{Decision, PredictionResult, RunReport};
pub use session::{PredictionSession, RunPhase};
pub use trainer::{EpochMetrics, TrainingHistory, train};
