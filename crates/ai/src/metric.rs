//! Business-rule metric derived from a product's figures.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockwise_core::{ProductRecord, coerce_quantity};

use crate::error::AiError;

/// Days-to-replenish value meaning "no sales, stock never runs out".
pub const DAYS_SENTINEL: f64 = 999.0;

/// The reorder rule a deployment runs with.
///
/// One rule drives the derived metric, the training label and the column the
/// presentation layer highlights.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderRule {
    /// Metric = `average_weekly_sales × lead_time`; reorder when `stock <= metric`.
    #[default]
    ReorderPoint,
    /// Metric = days of stock left at the current sales rate; reorder when
    /// `metric <= lead_time`.
    DaysToReplenish,
}

impl ReorderRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReorderRule::ReorderPoint => "reorder_point",
            ReorderRule::DaysToReplenish => "days_to_replenish",
        }
    }

    /// Column heading for the derived metric.
    pub fn metric_label(&self) -> &'static str {
        match self {
            ReorderRule::ReorderPoint => "Reorder Point",
            ReorderRule::DaysToReplenish => "Days Left",
        }
    }

    /// The derived metric for a catalog record.
    pub fn metric(&self, record: &ProductRecord) -> f64 {
        derive_metric(
            *self,
            record.stock,
            record.average_weekly_sales,
            record.lead_time,
        )
    }
}

impl fmt::Display for ReorderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReorderRule {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reorder_point" => Ok(ReorderRule::ReorderPoint),
            "days_to_replenish" | "days_left" => Ok(ReorderRule::DaysToReplenish),
            other => Err(AiError::InvalidInput(format!("unknown reorder rule '{other}'"))),
        }
    }
}

/// Compute the operational metric for one product.
///
/// Total: missing, negative and non-finite inputs read as `0`, and a zero
/// sales rate maps to [`DAYS_SENTINEL`] instead of dividing by zero. The
/// result is always non-negative.
pub fn derive_metric(
    rule: ReorderRule,
    stock: Option<f64>,
    average_weekly_sales: Option<f64>,
    lead_time: Option<f64>,
) -> f64 {
    let stock = coerce_quantity(stock);
    let weekly = coerce_quantity(average_weekly_sales);
    let lead_time = coerce_quantity(lead_time);

    match rule {
        ReorderRule::ReorderPoint => weekly * lead_time,
        ReorderRule::DaysToReplenish => days_to_replenish(stock, weekly),
    }
}

fn days_to_replenish(stock: f64, weekly_sales: f64) -> f64 {
    if weekly_sales == 0.0 {
        return DAYS_SENTINEL;
    }
    let days = (stock / (weekly_sales / 7.0)).floor();
    // Sales so small the quotient overflows: same as no sales at all.
    if days.is_finite() { days } else { DAYS_SENTINEL }
}
