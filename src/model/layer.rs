//! Dense (fully connected) layer with optional inverted dropout
//!
//! A dense layer computes `activation(input · weights + bias)`. When the layer
//! carries a dropout rate, units of its output are zeroed with that
//! probability during training and the survivors scaled by `1 / (1 - rate)`.

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::activation::Activation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weight matrix (input_size x output_size)
    pub weights: Array2<f64>,
    /// Bias vector (output_size)
    pub biases: Array1<f64>,
    pub activation: Activation,
    /// Fraction of output units dropped while training (0.0 = none)
    pub dropout: f64,
}

/// Values recorded by a training forward pass for the backward pass
#[derive(Debug, Clone)]
pub struct LayerCache {
    input: Array2<f64>,
    z: Array2<f64>,
    mask: Option<Array2<f64>>,
}

/// Parameter gradients of one layer
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

impl DenseLayer {
    /// Create a layer with Glorot-uniform weights and zero biases
    pub fn new(input_size: usize, output_size: usize, activation: Activation, rng: &mut StdRng) -> Self {
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        let weights = Array2::random_using((input_size, output_size), Uniform::new(-limit, limit), rng);

        Self {
            weights,
            biases: Array1::zeros(output_size),
            activation,
            dropout: 0.0,
        }
    }

    pub fn with_dropout(mut self, rate: f64) -> Self {
        self.dropout = rate.clamp(0.0, 1.0);
        self
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Inference pass: no dropout, nothing cached
    pub fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        let z = input.dot(&self.weights) + &self.biases;
        self.activation.forward(&z)
    }

    /// Training pass: applies dropout and records what `backward` needs
    pub fn forward_train(&self, input: &Array2<f64>, rng: &mut StdRng) -> (Array2<f64>, LayerCache) {
        let z = input.dot(&self.weights) + &self.biases;
        let mut output = self.activation.forward(&z);

        let mask = if self.dropout > 0.0 {
            let keep_scale = 1.0 / (1.0 - self.dropout);
            let rate = self.dropout;
            let mask = Array2::from_shape_fn(output.dim(), |_| {
                if rng.gen::<f64>() >= rate {
                    keep_scale
                } else {
                    0.0
                }
            });
            output = &output * &mask;
            Some(mask)
        } else {
            None
        };

        let cache = LayerCache {
            input: input.clone(),
            z,
            mask,
        };
        (output, cache)
    }

    /// Backpropagate `grad_output` (gradient w.r.t. this layer's output).
    ///
    /// Returns the gradient w.r.t. the layer input and the parameter gradients.
    pub fn backward(&self, cache: &LayerCache, grad_output: &Array2<f64>) -> (Array2<f64>, LayerGradients) {
        let grad = match &cache.mask {
            Some(mask) => grad_output * mask,
            None => grad_output.clone(),
        };
        let delta = &grad * &self.activation.derivative(&cache.z);

        let gradients = LayerGradients {
            weights: cache.input.t().dot(&delta),
            biases: delta.sum_axis(Axis(0)),
        };
        let grad_input = delta.dot(&self.weights.t());

        (grad_input, gradients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_layer_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = DenseLayer::new(10, 4, Activation::ReLU, &mut rng);

        assert_eq!(layer.weights.dim(), (10, 4));
        assert_eq!(layer.biases.len(), 4);
        assert_eq!(layer.num_parameters(), 44);
        assert_eq!(layer.forward(&Array2::ones((3, 10))).dim(), (3, 4));
    }

    #[test]
    fn test_glorot_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let layer = DenseLayer::new(20, 10, Activation::Linear, &mut rng);
        let limit = (6.0f64 / 30.0).sqrt();

        assert!(layer.weights.iter().all(|w| w.abs() <= limit));
    }

    #[test]
    fn test_dropout_zeroes_or_scales() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut layer = DenseLayer::new(2, 50, Activation::Linear, &mut rng).with_dropout(0.5);
        layer.weights.fill(0.0);
        layer.biases.fill(1.0);

        let (out, _) = layer.forward_train(&Array2::ones((4, 2)), &mut rng);
        assert!(out.iter().all(|&v| v == 0.0 || (v - 2.0).abs() < 1e-12));
        assert!(out.iter().any(|&v| v == 0.0));

        // Inference never drops
        assert!(layer.forward(&Array2::ones((4, 2))).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_linear_gradients() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut layer = DenseLayer::new(2, 1, Activation::Linear, &mut rng);
        layer.weights = ndarray::array![[2.0], [3.0]];

        let input = ndarray::array![[1.0, 1.0], [2.0, 0.0]];
        let (_, cache) = layer.forward_train(&input, &mut rng);
        let (grad_input, grads) = layer.backward(&cache, &ndarray::array![[1.0], [1.0]]);

        assert_eq!(grads.weights, ndarray::array![[3.0], [1.0]]);
        assert_eq!(grads.biases, ndarray::array![2.0]);
        assert_eq!(grad_input, ndarray::array![[2.0, 3.0], [2.0, 3.0]]);
    }
}
