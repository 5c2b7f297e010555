//! Activation functions for dense layers

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Activation applied to a layer's pre-activation values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Rectified Linear Unit: max(0, x)
    ReLU,
    /// Row-wise softmax: exp(x_i) / sum(exp(x_j))
    Softmax,
    /// Identity
    Linear,
}

impl Activation {
    pub fn forward(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| v.max(0.0)),
            Activation::Softmax => softmax_rows(z),
            Activation::Linear => z.clone(),
        }
    }

    /// Element-wise derivative with respect to the pre-activation.
    ///
    /// Softmax is only used as an output layer paired with cross-entropy,
    /// whose gradient is already taken with respect to the logits, so it
    /// passes gradients through unchanged.
    pub fn derivative(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Softmax | Activation::Linear => Array2::ones(z.dim()),
        }
    }
}

fn softmax_rows(z: &Array2<f64>) -> Array2<f64> {
    let mut out = z.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_relu() {
        let z = array![[-1.0, 0.0, 2.5]];
        assert_eq!(Activation::ReLU.forward(&z), array![[0.0, 0.0, 2.5]]);
        assert_eq!(Activation::ReLU.derivative(&z), array![[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let z = array![[1.0, 2.0, 3.0], [1000.0, 1000.0, 1000.0]];
        let p = Activation::Softmax.forward(&z);

        for row in p.axis_iter(Axis(0)) {
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(p[[1, 0]], 1.0 / 3.0, epsilon = 1e-12);
        assert!(p[[0, 2]] > p[[0, 1]] && p[[0, 1]] > p[[0, 0]]);
    }

    #[test]
    fn test_linear_is_identity() {
        let z = array![[-3.0, 4.0]];
        assert_eq!(Activation::Linear.forward(&z), z);
    }
}
