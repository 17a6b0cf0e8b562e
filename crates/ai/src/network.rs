//! Feed-forward binary classifier.
//!
//! Architecture: `3 → Dense(8, ReLU) → Dense(1, sigmoid)`, trained with binary
//! cross-entropy and Adam. Inputs are standardized per column with statistics
//! fitted on the training rows; the scaler travels with the weights so inference
//! applies the same transform.

use ndarray::{Array, Array1, Array2, ArrayView1, ArrayView2, Axis, Dimension, Zip};
use rand::Rng;
use rand::distributions::Uniform;

/// Width of the feature vector `[stock, average_weekly_sales, lead_time]`.
pub const INPUT_DIM: usize = 3;

/// Units in the hidden layer.
pub const HIDDEN_UNITS: usize = 8;

/// Probabilities are clamped to `[EPSILON, 1 - EPSILON]` inside the loss.
const LOSS_EPSILON: f64 = 1e-7;

/// Columns with a spread below this are left unscaled.
const MIN_SPREAD: f64 = 1e-6;

/// Fully-connected layer: `y = x · W + b`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dense {
    /// `inputs × units`
    pub(crate) weights: Array2<f64>,
    pub(crate) bias: Array1<f64>,
}

impl Dense {
    /// Glorot-uniform weights, zero bias.
    fn glorot<R: Rng + ?Sized>(inputs: usize, units: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (inputs + units) as f64).sqrt();
        let dist = Uniform::new_inclusive(-limit, limit);
        Self {
            weights: Array2::from_shape_fn((inputs, units), |_| rng.sample(dist)),
            bias: Array1::zeros(units),
        }
    }

    fn zeros_like(other: &Dense) -> Self {
        Self {
            weights: Array2::zeros(other.weights.raw_dim()),
            bias: Array1::zeros(other.bias.raw_dim()),
        }
    }

    fn forward(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        x.dot(&self.weights) + &self.bias
    }
}

/// Weights of the two dense layers. Gradients and Adam moments share the shape.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Network {
    pub(crate) hidden: Dense,
    pub(crate) output: Dense,
}

/// Intermediate activations kept for back-propagation.
#[derive(Debug)]
pub(crate) struct ForwardPass {
    hidden_pre: Array2<f64>,
    hidden: Array2<f64>,
    /// Output probabilities, one per row.
    pub(crate) probabilities: Array1<f64>,
}

impl Network {
    pub(crate) fn glorot<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            hidden: Dense::glorot(INPUT_DIM, HIDDEN_UNITS, &mut *rng),
            output: Dense::glorot(HIDDEN_UNITS, 1, &mut *rng),
        }
    }

    fn zeros_like(other: &Network) -> Self {
        Self {
            hidden: Dense::zeros_like(&other.hidden),
            output: Dense::zeros_like(&other.output),
        }
    }

    /// Forward a batch of (already scaled) rows.
    pub(crate) fn forward(&self, x: ArrayView2<'_, f64>) -> ForwardPass {
        let hidden_pre = self.hidden.forward(x);
        let hidden = hidden_pre.mapv(relu);
        let logits = self.output.forward(hidden.view());
        let probabilities = logits.column(0).mapv(sigmoid);
        ForwardPass {
            hidden_pre,
            hidden,
            probabilities,
        }
    }

    /// Gradients of the mean binary cross-entropy over the batch.
    pub(crate) fn backward(
        &self,
        x: ArrayView2<'_, f64>,
        targets: ArrayView1<'_, f64>,
        pass: &ForwardPass,
    ) -> Network {
        let n = x.nrows().max(1) as f64;

        // d(BCE)/d(logit) for a sigmoid output is (p - y).
        let d_logits = ((&pass.probabilities - &targets) / n).insert_axis(Axis(1));

        let output = Dense {
            weights: pass.hidden.t().dot(&d_logits),
            bias: d_logits.sum_axis(Axis(0)),
        };

        let mut d_hidden = d_logits.dot(&self.output.weights.t());
        d_hidden.zip_mut_with(&pass.hidden_pre, |g, &z| {
            if z <= 0.0 {
                *g = 0.0;
            }
        });

        let hidden = Dense {
            weights: x.t().dot(&d_hidden),
            bias: d_hidden.sum_axis(Axis(0)),
        };

        Network { hidden, output }
    }
}

/// Adam optimizer state (`lr`, β1 = 0.9, β2 = 0.999, ε = 1e-7).
#[derive(Debug, Clone)]
pub(crate) struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    iterations: i32,
    first: Network,
    second: Network,
}

impl Adam {
    pub(crate) fn new(params: &Network, learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            iterations: 0,
            first: Network::zeros_like(params),
            second: Network::zeros_like(params),
        }
    }

    pub(crate) fn step(&mut self, params: &mut Network, grads: &Network) {
        self.iterations = self.iterations.saturating_add(1);
        let hyper = AdamStep {
            learning_rate: self.learning_rate,
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
            correction1: 1.0 - self.beta1.powi(self.iterations),
            correction2: 1.0 - self.beta2.powi(self.iterations),
        };

        hyper.apply(
            &mut params.hidden.weights,
            &grads.hidden.weights,
            &mut self.first.hidden.weights,
            &mut self.second.hidden.weights,
        );
        hyper.apply(
            &mut params.hidden.bias,
            &grads.hidden.bias,
            &mut self.first.hidden.bias,
            &mut self.second.hidden.bias,
        );
        hyper.apply(
            &mut params.output.weights,
            &grads.output.weights,
            &mut self.first.output.weights,
            &mut self.second.output.weights,
        );
        hyper.apply(
            &mut params.output.bias,
            &grads.output.bias,
            &mut self.first.output.bias,
            &mut self.second.output.bias,
        );
    }
}

#[derive(Debug, Clone, Copy)]
struct AdamStep {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    correction1: f64,
    correction2: f64,
}

impl AdamStep {
    fn apply<D: Dimension>(
        &self,
        param: &mut Array<f64, D>,
        grad: &Array<f64, D>,
        m: &mut Array<f64, D>,
        v: &mut Array<f64, D>,
    ) {
        Zip::from(param)
            .and(grad)
            .and(m)
            .and(v)
            .for_each(|p, &g, m, v| {
                *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
                let m_hat = *m / self.correction1;
                let v_hat = *v / self.correction2;
                *p -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
            });
    }
}

/// Per-column standardization fitted on the training features.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl Standardizer {
    pub(crate) fn fit(features: ArrayView2<'_, f64>) -> Self {
        let mean = features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(features.ncols()));
        let scale = features
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < MIN_SPREAD { 1.0 } else { s });
        Self { mean, scale }
    }

    pub(crate) fn transform(&self, features: ArrayView2<'_, f64>) -> Array2<f64> {
        (&features - &self.mean) / &self.scale
    }

    pub(crate) fn transform_row(&self, row: ArrayView1<'_, f64>) -> Array1<f64> {
        (&row - &self.mean) / &self.scale
    }
}

/// Trained reorder classifier.
///
/// Owned by one prediction session and never mutated by inference.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderModel {
    network: Network,
    scaler: Standardizer,
}

impl ReorderModel {
    pub(crate) fn new(network: Network, scaler: Standardizer) -> Self {
        Self { network, scaler }
    }

    /// Probability in `[0, 1]` that the product described by `features` needs a
    /// reorder.
    pub fn predict_proba(&self, features: &[f64; INPUT_DIM]) -> f64 {
        self.forward_row(ArrayView1::from(&features[..]))
    }

    pub(crate) fn forward_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let scaled = self.scaler.transform_row(row).insert_axis(Axis(0));
        let pass = self.network.forward(scaled.view());
        pass.probabilities[0]
    }

    /// Number of trainable parameters (weights and biases).
    pub fn parameter_count(&self) -> usize {
        let h = &self.network.hidden;
        let o = &self.network.output;
        h.weights.len() + h.bias.len() + o.weights.len() + o.bias.len()
    }
}

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Mean binary cross-entropy of `probabilities` against 0/1 `targets`.
pub(crate) fn binary_cross_entropy(probabilities: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let total: f64 = probabilities
        .iter()
        .zip(targets.iter())
        .map(|(&p, &y)| {
            let p = p.clamp(LOSS_EPSILON, 1.0 - LOSS_EPSILON);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / probabilities.len() as f64
}

/// Number of rows whose thresholded probability matches the target.
pub(crate) fn correct_predictions(probabilities: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> usize {
    probabilities
        .iter()
        .zip(targets.iter())
        .filter(|&(&p, &y)| (p > 0.5) == (y == 1.0))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn network() -> Network {
        Network::glorot(&mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn shapes() {
        let net = network();
        assert_eq!(net.hidden.weights.shape(), &[INPUT_DIM, HIDDEN_UNITS]);
        assert_eq!(net.hidden.bias.len(), HIDDEN_UNITS);
        assert_eq!(net.output.weights.shape(), &[HIDDEN_UNITS, 1]);
        assert_eq!(net.output.bias.len(), 1);

        let x = array![[0.1, 0.2, 0.3], [1.0, -1.0, 0.5]];
        let pass = net.forward(x.view());
        assert_eq!(pass.probabilities.len(), 2);
        assert!(pass.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn glorot_weights_are_bounded() {
        let net = network();
        let limit = (6.0 / (INPUT_DIM + HIDDEN_UNITS) as f64).sqrt();
        assert!(net.hidden.weights.iter().all(|w| w.abs() <= limit));
        assert!(net.hidden.bias.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn backward_matches_finite_differences() {
        let net = network();
        let x = array![[0.5, -1.2, 0.3], [-0.7, 0.4, 1.1], [1.5, 0.2, -0.4]];
        let y = array![1.0, 0.0, 1.0];

        let pass = net.forward(x.view());
        let grads = net.backward(x.view(), y.view(), &pass);

        let loss = |n: &Network| binary_cross_entropy(n.forward(x.view()).probabilities.view(), y.view());
        let h = 1e-6;

        for (i, j) in [(0usize, 0usize), (1, 3), (2, 7)] {
            let mut plus = net.clone();
            plus.hidden.weights[[i, j]] += h;
            let mut minus = net.clone();
            minus.hidden.weights[[i, j]] -= h;
            let numeric = (loss(&plus) - loss(&minus)) / (2.0 * h);
            assert!(
                (numeric - grads.hidden.weights[[i, j]]).abs() < 1e-5,
                "hidden w[{i},{j}]: numeric {numeric} vs analytic {}",
                grads.hidden.weights[[i, j]]
            );
        }

        for j in 0..HIDDEN_UNITS {
            let mut plus = net.clone();
            plus.output.weights[[j, 0]] += h;
            let mut minus = net.clone();
            minus.output.weights[[j, 0]] -= h;
            let numeric = (loss(&plus) - loss(&minus)) / (2.0 * h);
            assert!((numeric - grads.output.weights[[j, 0]]).abs() < 1e-5);
        }

        let mut plus = net.clone();
        plus.output.bias[0] += h;
        let mut minus = net.clone();
        minus.output.bias[0] -= h;
        let numeric = (loss(&plus) - loss(&minus)) / (2.0 * h);
        assert!((numeric - grads.output.bias[0]).abs() < 1e-5);
    }

    #[test]
    fn adam_steps_reduce_loss() {
        let mut net = network();
        let x = array![[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.9, 0.1, 0.0], [-0.8, -0.2, 0.0]];
        let y = array![1.0, 0.0, 1.0, 0.0];
        let mut adam = Adam::new(&net, 0.05);

        let before = binary_cross_entropy(net.forward(x.view()).probabilities.view(), y.view());
        for _ in 0..100 {
            let pass = net.forward(x.view());
            let grads = net.backward(x.view(), y.view(), &pass);
            adam.step(&mut net, &grads);
        }
        let after = binary_cross_entropy(net.forward(x.view()).probabilities.view(), y.view());
        assert!(after < before, "loss did not decrease: {before} -> {after}");
    }

    #[test]
    fn standardizer_centres_columns_and_skips_constant_ones() {
        let x = array![[1.0, 5.0, 2.0], [3.0, 5.0, 4.0]];
        let scaler = Standardizer::fit(x.view());
        let scaled = scaler.transform(x.view());
        assert_eq!(scaled.column(0).to_vec(), vec![-1.0, 1.0]);
        // constant column: centred, not divided by zero
        assert_eq!(scaled.column(1).to_vec(), vec![0.0, 0.0]);
        assert_eq!(scaler.transform_row(x.row(1)).to_vec(), scaled.row(1).to_vec());
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(1_000.0) <= 1.0);
        assert!(sigmoid(-1_000.0) >= 0.0);
        assert!(!sigmoid(-1_000.0).is_nan());
    }

    #[test]
    fn cross_entropy_is_finite_for_confident_mistakes() {
        let p = array![1.0, 0.0];
        let y = array![0.0, 1.0];
        let loss = binary_cross_entropy(p.view(), y.view());
        assert!(loss.is_finite());
        assert!(loss > 10.0);
        assert_eq!(correct_predictions(p.view(), y.view()), 0);
    }

    #[test]
    fn model_parameter_count() {
        let model = ReorderModel::new(network(), Standardizer::fit(array![[0.0, 0.0, 0.0]].view()));
        assert_eq!(model.parameter_count(), 3 * 8 + 8 + 8 + 1);
        let p = model.predict_proba(&[10.0, 7.0, 2.0]);
        assert!((0.0..=1.0).contains(&p));
    }
}
