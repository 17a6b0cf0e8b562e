//! Merge inputs, derived metric and decision into ordered results.

use tracing::debug;

use stockwise_core::ProductRecord;

use crate::buffer::BufferTracker;
use crate::cancel::CancellationToken;
use crate::error::AiError;
use crate::inference::predict;
use crate::metric::ReorderRule;
use crate::network::ReorderModel;
use crate::result::PredictionResult;

/// Predict every record of `catalog`, in catalog order.
///
/// No filtering, reordering or deduplication: result `i` belongs to record `i`.
/// Cancellation is honoured between records and discards what was computed so
/// far.
pub fn aggregate(
    rule: ReorderRule,
    catalog: &[ProductRecord],
    model: &ReorderModel,
    buffers: &BufferTracker,
    cancel: &CancellationToken,
) -> Result<Vec<PredictionResult>, AiError> {
    let mut results = Vec::with_capacity(catalog.len());

    for record in catalog {
        cancel.check()?;

        let prediction = predict(model, record, buffers);
        results.push(PredictionResult {
            name: record.name.clone(),
            stock: record.stock(),
            average_weekly_sales: record.average_weekly_sales(),
            lead_time: record.lead_time(),
            derived_metric: rule.metric(record),
            probability: prediction.probability,
            decision: prediction.decision,
        });
    }

    debug!(
        %rule,
        products = results.len(),
        reorders = results.iter().filter(|r| r.decision.is_reorder()).count(),
        "inference complete"
    );
    Ok(results)
}
