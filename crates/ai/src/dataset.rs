//! Training dataset assembled from the catalog.

use ndarray::{Array1, Array2};

use stockwise_core::ProductRecord;

use crate::label::derive_label;
use crate::metric::ReorderRule;
use crate::network::INPUT_DIM;

/// Feature matrix (one row per product) and matching label vector.
///
/// Row `i` of `features` and entry `i` of `labels` describe catalog record `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

impl Dataset {
    /// Wrap pre-built arrays. Shapes are checked by the trainer, not here.
    pub fn from_parts(features: Array2<f64>, labels: Array1<f64>) -> Self {
        Self { features, labels }
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of examples labelled "reorder".
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&y| y == 1.0).count()
    }
}

/// Classifier input for one product: `[stock, average_weekly_sales, lead_time]`.
pub fn feature_row(record: &ProductRecord) -> [f64; INPUT_DIM] {
    [record.stock(), record.average_weekly_sales(), record.lead_time()]
}

/// Build the training set for `catalog` under `rule`, preserving catalog order.
pub fn build_dataset(rule: ReorderRule, catalog: &[ProductRecord]) -> Dataset {
    let rows: Vec<[f64; INPUT_DIM]> = catalog.iter().map(feature_row).collect();
    let features = Array2::from_shape_fn((rows.len(), INPUT_DIM), |(i, j)| rows[i][j]);
    let labels = catalog
        .iter()
        .map(|record| derive_label(rule, record, rule.metric(record)).as_f64())
        .collect::<Array1<f64>>();

    Dataset { features, labels }
}
