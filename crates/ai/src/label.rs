//! Training label derived from the business rule.

use serde::{Deserialize, Serialize};

use stockwise_core::ProductRecord;

use crate::metric::ReorderRule;

/// Ground truth attached to a training example.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    NoReorder = 0,
    Reorder = 1,
}

impl Label {
    /// Numeric target used by the classifier (`0.0` / `1.0`).
    pub fn as_f64(self) -> f64 {
        match self {
            Label::NoReorder => 0.0,
            Label::Reorder => 1.0,
        }
    }

    pub fn is_reorder(self) -> bool {
        matches!(self, Label::Reorder)
    }
}

impl From<bool> for Label {
    fn from(reorder: bool) -> Self {
        if reorder { Label::Reorder } else { Label::NoReorder }
    }
}

/// Apply `rule`'s threshold to `metric` (as produced by [`ReorderRule::metric`]).
///
/// - reorder point: reorder when `stock <= metric`
/// - days-to-replenish: reorder when `metric <= lead_time`
pub fn derive_label(rule: ReorderRule, record: &ProductRecord, metric: f64) -> Label {
    match rule {
        ReorderRule::ReorderPoint => Label::from(record.stock() <= metric),
        ReorderRule::DaysToReplenish => Label::from(metric <= record.lead_time()),
    }
}
