//! Classifier training loop.

use ndarray::Axis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::BufferTracker;
use crate::cancel::CancellationToken;
use crate::config::TrainingConfig;
use crate::dataset::Dataset;
use crate::error::AiError;
use crate::network::{
    Adam, INPUT_DIM, Network, ReorderModel, Standardizer, binary_cross_entropy, correct_predictions,
};

/// Loss and accuracy observed during one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean binary cross-entropy over the epoch's batches.
    pub loss: f64,
    /// Fraction of examples classified correctly while fitting.
    pub accuracy: f64,
}

/// Per-epoch record of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.last().map(|m| m.loss)
    }

    pub fn final_accuracy(&self) -> Option<f64> {
        self.last().map(|m| m.accuracy)
    }
}

/// Fit a reorder classifier on `dataset`.
///
/// Every transient tensor (scaled features, targets, mini-batch copies) is
/// acquired from `buffers` and released before this returns, whether training
/// succeeds, fails or is cancelled.
pub fn train(
    dataset: &Dataset,
    config: &TrainingConfig,
    buffers: &BufferTracker,
    cancel: &CancellationToken,
) -> Result<(ReorderModel, TrainingHistory), AiError> {
    config.validate()?;
    check_dataset(dataset)?;

    let n = dataset.len();
    let scaler = Standardizer::fit(dataset.features.view());
    let features = buffers.acquire(scaler.transform(dataset.features.view()));
    let targets = buffers.acquire(dataset.labels.clone());

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut network = Network::glorot(&mut rng);
    let mut optimizer = Adam::new(&network, config.learning_rate);
    let mut order: Vec<usize> = (0..n).collect();
    let mut history = TrainingHistory::default();

    for epoch in 1..=config.epochs {
        cancel.check()?;

        if config.shuffle {
            order.shuffle(&mut rng);
        }

        let mut loss_sum = 0.0;
        let mut correct = 0usize;

        for batch in order.chunks(config.batch_size) {
            let x = buffers.acquire(features.select(Axis(0), batch));
            let y = buffers.acquire(targets.select(Axis(0), batch));

            let pass = network.forward(x.view());
            loss_sum += binary_cross_entropy(pass.probabilities.view(), y.view()) * batch.len() as f64;
            correct += correct_predictions(pass.probabilities.view(), y.view());

            let grads = network.backward(x.view(), y.view(), &pass);
            optimizer.step(&mut network, &grads);
        }

        let metrics = EpochMetrics {
            epoch,
            loss: loss_sum / n as f64,
            accuracy: correct as f64 / n as f64,
        };

        if !metrics.loss.is_finite() {
            return Err(AiError::TrainingFailed(format!(
                "loss diverged at epoch {epoch} ({})",
                metrics.loss
            )));
        }

        debug!(epoch, loss = metrics.loss, accuracy = metrics.accuracy, "epoch complete");
        history.epochs.push(metrics);
    }

    Ok((ReorderModel::new(network, scaler), history))
}

fn check_dataset(dataset: &Dataset) -> Result<(), AiError> {
    if dataset.is_empty() {
        return Err(AiError::TrainingFailed("dataset is empty".to_string()));
    }
    if dataset.features.ncols() != INPUT_DIM {
        return Err(AiError::TrainingFailed(format!(
            "expected {INPUT_DIM} feature columns, got {}",
            dataset.features.ncols()
        )));
    }
    if dataset.labels.len() != dataset.len() {
        return Err(AiError::TrainingFailed(format!(
            "{} feature rows but {} labels",
            dataset.len(),
            dataset.labels.len()
        )));
    }
    if dataset.features.iter().any(|v| !v.is_finite()) {
        return Err(AiError::TrainingFailed(
            "feature matrix contains non-finite values".to_string(),
        ));
    }
    if dataset.labels.iter().any(|&y| y != 0.0 && y != 1.0) {
        return Err(AiError::TrainingFailed("labels must be 0 or 1".to_string()));
    }
    Ok(())
}
