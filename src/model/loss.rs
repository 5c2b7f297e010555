//! Loss functions and tracked metrics

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Probabilities are clipped to this before taking logs
const EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossFunction {
    /// Cross-entropy over softmax outputs with integer class targets
    SparseCategoricalCrossEntropy,
    /// Mean squared error
    MeanSquaredError,
}

impl LossFunction {
    /// Mean loss over the batch.
    ///
    /// `targets` holds class ids for cross-entropy and values for MSE.
    pub fn compute(&self, outputs: &Array2<f64>, targets: &Array1<f64>) -> f64 {
        let n = outputs.nrows() as f64;
        match self {
            LossFunction::SparseCategoricalCrossEntropy => {
                let total: f64 = outputs
                    .axis_iter(Axis(0))
                    .zip(targets.iter())
                    .map(|(row, &t)| -row[t as usize].clamp(EPSILON, 1.0).ln())
                    .sum();
                total / n
            }
            LossFunction::MeanSquaredError => {
                let diff = outputs.column(0).to_owned() - targets;
                diff.mapv(|d| d * d).sum() / n
            }
        }
    }

    /// Gradient of the mean loss w.r.t. the output layer.
    ///
    /// For cross-entropy the gradient is taken w.r.t. the softmax logits
    /// (`p - onehot(t)`), which is why softmax has an identity derivative.
    pub fn gradient(&self, outputs: &Array2<f64>, targets: &Array1<f64>) -> Array2<f64> {
        let n = outputs.nrows() as f64;
        match self {
            LossFunction::SparseCategoricalCrossEntropy => {
                let mut grad = outputs.clone();
                for (mut row, &t) in grad.axis_iter_mut(Axis(0)).zip(targets.iter()) {
                    row[t as usize] -= 1.0;
                }
                grad / n
            }
            LossFunction::MeanSquaredError => {
                let mut grad = outputs.clone();
                for (mut row, &t) in grad.axis_iter_mut(Axis(0)).zip(targets.iter()) {
                    row[0] = 2.0 * (row[0] - t) / n;
                }
                grad
            }
        }
    }
}

/// Performance metric reported next to the loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Accuracy,
    MeanAbsoluteError,
}

impl Metric {
    /// Short key, as used in history logs
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::MeanAbsoluteError => "mae",
        }
    }

    /// Axis label for charts
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Accuracy => "Accuracy",
            Metric::MeanAbsoluteError => "MAE",
        }
    }

    pub fn compute(&self, outputs: &Array2<f64>, targets: &Array1<f64>) -> f64 {
        let n = outputs.nrows() as f64;
        match self {
            Metric::Accuracy => {
                let correct = argmax_rows(outputs)
                    .into_iter()
                    .zip(targets.iter())
                    .filter(|(pred, &t)| *pred == t as usize)
                    .count();
                correct as f64 / n
            }
            Metric::MeanAbsoluteError => {
                let diff = outputs.column(0).to_owned() - targets;
                diff.mapv(f64::abs).sum() / n
            }
        }
    }
}

/// Index of the largest value in every row
pub fn argmax_rows(outputs: &Array2<f64>) -> Vec<usize> {
    outputs
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best_i, best_v), (i, &v)| {
                    if v > best_v {
                        (i, v)
                    } else {
                        (best_i, best_v)
                    }
                })
                .0
        })
        .collect()
}
