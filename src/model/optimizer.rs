//! Adam optimizer (Adaptive Moment Estimation)

use ndarray::{Array1, Array2};

use super::layer::{DenseLayer, LayerGradients};

/// First and second moment estimates for one layer
#[derive(Debug, Clone)]
struct Moments {
    m_w: Array2<f64>,
    v_w: Array2<f64>,
    m_b: Array1<f64>,
    v_b: Array1<f64>,
}

impl Moments {
    fn zeros_like(layer: &DenseLayer) -> Self {
        Self {
            m_w: Array2::zeros(layer.weights.dim()),
            v_w: Array2::zeros(layer.weights.dim()),
            m_b: Array1::zeros(layer.biases.len()),
            v_b: Array1::zeros(layer.biases.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    moments: Vec<Moments>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            moments: Vec::new(),
        }
    }

    /// Apply one update to every layer.
    ///
    /// The bias correction is folded into the step size:
    /// `lr_t = lr * sqrt(1 - beta2^t) / (1 - beta1^t)`.
    pub fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) {
        if self.moments.len() != layers.len() {
            self.moments = layers.iter().map(Moments::zeros_like).collect();
        }

        self.t += 1;
        let (b1, b2, eps) = (self.beta1, self.beta2, self.epsilon);
        let lr_t = self.learning_rate * (1.0 - b2.powi(self.t)).sqrt() / (1.0 - b1.powi(self.t));

        for ((layer, grads), m) in layers.iter_mut().zip(gradients).zip(self.moments.iter_mut()) {
            m.m_w = &m.m_w * b1 + &grads.weights * (1.0 - b1);
            m.v_w = &m.v_w * b2 + &grads.weights.mapv(|g| g * g) * (1.0 - b2);
            layer.weights = &layer.weights - &(&m.m_w * lr_t / &(m.v_w.mapv(f64::sqrt) + eps));

            m.m_b = &m.m_b * b1 + &grads.biases * (1.0 - b1);
            m.v_b = &m.v_b * b2 + &grads.biases.mapv(|g| g * g) * (1.0 - b2);
            layer.biases = &layer.biases - &(&m.m_b * lr_t / &(m.v_b.mapv(f64::sqrt) + eps));
        }
    }

    pub fn steps(&self) -> i32 {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::activation::Activation;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_first_step_moves_by_learning_rate() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut layers = vec![DenseLayer::new(2, 1, Activation::Linear, &mut rng)];
        let before = layers[0].weights.clone();
        let grads = vec![LayerGradients {
            weights: Array2::ones((2, 1)),
            biases: Array1::ones(1),
        }];

        let mut adam = Adam::new(0.001);
        adam.step(&mut layers, &grads);

        // With a constant gradient the first normalized step is ~lr
        for (w, b) in layers[0].weights.iter().zip(before.iter()) {
            assert_relative_eq!(b - w, 0.001, epsilon = 1e-6);
        }
        assert_relative_eq!(layers[0].biases[0], -0.001, epsilon = 1e-6);
        assert_eq!(adam.steps(), 1);
    }
}
