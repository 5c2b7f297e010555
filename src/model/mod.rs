//! Neural network module
//!
//! Building blocks for the feed-forward networks used by both trainers:
//! - Activations (ReLU, Softmax, Linear)
//! - Dense layers with inverted dropout
//! - Losses and metrics
//! - Adam optimizer, early stopping and the training loop

pub mod activation;
pub mod early_stopping;
pub mod history;
pub mod layer;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod training;

pub use activation::Activation;
pub use early_stopping::{EarlyStopping, EpochOutcome};
pub use history::{EpochLog, TrainingHistory};
pub use layer::DenseLayer;
pub use loss::{argmax_rows, LossFunction, Metric};
pub use network::{LayerSpec, NetworkConfig, NeuralNetwork};
pub use optimizer::Adam;
pub use training::{fit, TrainingConfig};
