//! Task-specific trainers: burnout risk classification and wellbeing regression

pub mod classifier;
pub mod regressor;

pub use classifier::*;
pub use regressor::*;

use crate::model::{NeuralNetwork, TrainingHistory};

/// A network after training, with the log of how it got there
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub network: NeuralNetwork,
    pub history: TrainingHistory,
}
