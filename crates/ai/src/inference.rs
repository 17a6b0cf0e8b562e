//! Per-product inference.

use ndarray::Array1;

use stockwise_core::ProductRecord;

use crate::buffer::BufferTracker;
use crate::dataset::feature_row;
use crate::network::ReorderModel;
use crate::result::Decision;

/// Probabilities strictly above this are a reorder.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Classifier output for one product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub decision: Decision,
}

impl Prediction {
    pub fn from_probability(probability: f64) -> Self {
        let decision = if probability > DECISION_THRESHOLD {
            Decision::Reorder
        } else {
            Decision::NoReorder
        };
        Self {
            probability,
            decision,
        }
    }
}

/// Run `model` on one record.
///
/// The feature vector uses the same layout and missing-value handling as
/// training. Its buffer is released before returning. The model is only read.
pub fn predict(model: &ReorderModel, record: &ProductRecord, buffers: &BufferTracker) -> Prediction {
    let input = buffers.acquire(Array1::from(feature_row(record).to_vec()));
    let probability = model.forward_row(input.view());
    Prediction::from_probability(probability)
}
