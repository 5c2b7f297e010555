//! Feed-forward network built from a layer specification

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Table};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::activation::Activation;
use super::layer::{DenseLayer, LayerCache, LayerGradients};
use super::loss::{argmax_rows, LossFunction, Metric};
use crate::error::PipelineError;

/// One dense layer of the topology
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub units: usize,
    pub activation: Activation,
    /// Dropout applied to this layer's output while training
    pub dropout: f64,
}

/// Network topology plus the loss it is trained with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub layers: Vec<LayerSpec>,
    pub loss: LossFunction,
    pub metric: Metric,
}

impl NetworkConfig {
    pub fn new(input_size: usize, loss: LossFunction, metric: Metric) -> Self {
        Self {
            input_size,
            layers: Vec::new(),
            loss,
            metric,
        }
    }

    /// Append a dense layer
    pub fn dense(mut self, units: usize, activation: Activation) -> Self {
        self.layers.push(LayerSpec {
            units,
            activation,
            dropout: 0.0,
        });
        self
    }

    /// Put dropout after the most recently added dense layer
    pub fn dropout(mut self, rate: f64) -> Self {
        if let Some(last) = self.layers.last_mut() {
            last.dropout = rate;
        }
        self
    }

    /// Units of the final layer (the input width for an empty topology)
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(self.input_size, |l| l.units)
    }
}

/// Dense network with learned weights.
///
/// Prediction only borrows the network; training goes through
/// `model::training::fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralNetwork {
    config: NetworkConfig,
    layers: Vec<DenseLayer>,
}

impl NeuralNetwork {
    /// Build the layers of `config` with weights drawn from `seed`
    pub fn new(config: NetworkConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut input_size = config.input_size;
        let mut layers = Vec::with_capacity(config.layers.len());

        for spec in &config.layers {
            layers.push(
                DenseLayer::new(input_size, spec.units, spec.activation, &mut rng).with_dropout(spec.dropout),
            );
            input_size = spec.units;
        }

        Self { config, layers }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    pub(crate) fn set_layers(&mut self, layers: Vec<DenseLayer>) {
        self.layers = layers;
    }

    pub fn input_size(&self) -> usize {
        self.config.input_size
    }

    pub fn output_size(&self) -> usize {
        self.config.output_size()
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.num_parameters()).sum()
    }

    fn check_input(&self, x: &Array2<f64>) -> Result<(), PipelineError> {
        if x.ncols() != self.input_size() {
            return Err(PipelineError::ShapeMismatch {
                context: "network input".to_string(),
                expected: self.input_size(),
                actual: x.ncols(),
            });
        }
        Ok(())
    }

    /// Raw outputs (softmax probabilities or regression values), one row per sample
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        self.check_input(x)?;
        let mut output = x.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        Ok(output)
    }

    /// Most probable class per sample
    pub fn predict_classes(&self, x: &Array2<f64>) -> Result<Vec<usize>, PipelineError> {
        Ok(argmax_rows(&self.predict(x)?))
    }

    /// First output unit per sample, unclamped
    pub fn predict_values(&self, x: &Array2<f64>) -> Result<Array1<f64>, PipelineError> {
        Ok(self.predict(x)?.column(0).to_owned())
    }

    /// Loss and metric over a whole dataset, without dropout
    pub fn evaluate(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(f64, f64), PipelineError> {
        let outputs = self.predict(x)?;
        Ok((
            self.config.loss.compute(&outputs, y),
            self.config.metric.compute(&outputs, y),
        ))
    }

    /// Forward pass with dropout, returning outputs and per-layer caches
    pub(crate) fn forward_train(&self, x: &Array2<f64>, rng: &mut StdRng) -> (Array2<f64>, Vec<LayerCache>) {
        let mut caches = Vec::with_capacity(self.layers.len());
        let mut output = x.clone();
        for layer in &self.layers {
            let (next, cache) = layer.forward_train(&output, rng);
            caches.push(cache);
            output = next;
        }
        (output, caches)
    }

    /// Parameter gradients for a batch, given the training-pass caches
    pub(crate) fn backward(
        &self,
        outputs: &Array2<f64>,
        targets: &Array1<f64>,
        caches: &[LayerCache],
    ) -> Vec<LayerGradients> {
        let mut grad = self.config.loss.gradient(outputs, targets);
        let mut gradients = Vec::with_capacity(self.layers.len());

        for (layer, cache) in self.layers.iter().zip(caches).rev() {
            let (grad_input, layer_grads) = layer.backward(cache, &grad);
            gradients.push(layer_grads);
            grad = grad_input;
        }

        gradients.reverse();
        gradients
    }

    /// Save the topology and weights as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create model file: {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write model file: {}", path.display()))?;
        Ok(())
    }

    /// Load a network written by `save`
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file: {}", path.display()))?;
        let network: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse model file: {}", path.display()))?;
        Ok(network)
    }

    /// Layer-by-layer summary table
    pub fn summary(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Layer").add_attribute(Attribute::Bold),
            Cell::new("Shape").add_attribute(Attribute::Bold),
            Cell::new("Activation").add_attribute(Attribute::Bold),
            Cell::new("Dropout").add_attribute(Attribute::Bold),
            Cell::new("Params").add_attribute(Attribute::Bold),
        ]);

        for (i, layer) in self.layers.iter().enumerate() {
            table.add_row(vec![
                Cell::new(format!("dense_{}", i + 1)),
                Cell::new(format!("{} -> {}", layer.input_size(), layer.output_size())),
                Cell::new(format!("{:?}", layer.activation)),
                Cell::new(if layer.dropout > 0.0 {
                    format!("{:.1}", layer.dropout)
                } else {
                    "-".to_string()
                }),
                Cell::new(layer.num_parameters()),
            ]);
        }

        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            Cell::new(self.num_parameters()).add_attribute(Attribute::Bold),
        ]);

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tiny_config() -> NetworkConfig {
        NetworkConfig::new(4, LossFunction::MeanSquaredError, Metric::MeanAbsoluteError)
            .dense(8, Activation::ReLU)
            .dropout(0.2)
            .dense(1, Activation::Linear)
    }

    #[test]
    fn test_builder_attaches_dropout_to_last_layer() {
        let config = tiny_config();
        assert_eq!(config.layers[0].dropout, 0.2);
        assert_eq!(config.layers[1].dropout, 0.0);
        assert_eq!(config.output_size(), 1);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let a = NeuralNetwork::new(tiny_config(), 9);
        let b = NeuralNetwork::new(tiny_config(), 9);
        assert_eq!(a.layers()[0].weights, b.layers()[0].weights);
        assert_eq!(a.num_parameters(), 4 * 8 + 8 + 8 + 1);
    }

    #[test]
    fn test_summary_lists_every_layer_and_total() {
        let network = NeuralNetwork::new(tiny_config(), 2);
        let table = network.summary();
        let rendered = table.to_string();

        assert_eq!(table.row_count(), 3);
        assert!(rendered.contains("dense_1"));
        assert!(rendered.contains("4 -> 8"));
        assert!(rendered.contains("0.2"));
        assert!(rendered.contains(&network.num_parameters().to_string()));
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let network = NeuralNetwork::new(tiny_config(), 1);
        let err = network.predict(&Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn test_save_and_load_preserve_predictions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        let network = NeuralNetwork::new(tiny_config(), 5);
        let x = Array2::from_shape_fn((3, 4), |(i, j)| (i * 4 + j) as f64 / 10.0);

        network.save(&path).unwrap();
        let loaded = NeuralNetwork::load(&path).unwrap();

        assert_eq!(loaded.config(), network.config());
        let before = network.predict(&x).unwrap();
        let after = loaded.predict(&x).unwrap();
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
