use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockwise_core::RunId;

use crate::metric::ReorderRule;
use crate::trainer::TrainingHistory;

/// Thresholded classifier output for one product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Reorder,
    NoReorder,
}

impl Decision {
    pub fn is_reorder(self) -> bool {
        matches!(self, Decision::Reorder)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Reorder => "Reorder",
            Decision::NoReorder => "No Reorder",
        }
    }
}

impl core::fmt::Display for Decision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row: the product's (coerced) inputs, its derived metric and
/// the classifier's decision.
///
/// This is a recommendation for display, not a stock movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub name: String,
    pub stock: f64,
    pub average_weekly_sales: f64,
    pub lead_time: f64,
    pub derived_metric: f64,
    pub probability: f64,
    pub decision: Decision,
}

/// Outcome of one prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub rule: ReorderRule,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// `None` when the trainer was never invoked (empty catalog).
    pub history: Option<TrainingHistory>,
    /// One entry per catalog record, in catalog order.
    pub results: Vec<PredictionResult>,
}

impl RunReport {
    pub fn reorder_count(&self) -> usize {
        self.results.iter().filter(|r| r.decision.is_reorder()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
