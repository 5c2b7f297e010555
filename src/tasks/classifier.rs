//! Burnout risk classifier

use crate::error::PipelineError;
use crate::model::{fit, Activation, LossFunction, Metric, NetworkConfig, NeuralNetwork, TrainingConfig};
use crate::pipeline::DataSplit;

use super::TrainedModel;

/// Chart and file title of the classification run
pub const CLASSIFICATION_TITLE: &str = "Burnout_Classification";

/// 64 -> 32 -> 16 ReLU layers with dropout 0.2 and 0.1, softmax over `num_classes`
pub fn classifier_config(input_size: usize, num_classes: usize) -> NetworkConfig {
    NetworkConfig::new(
        input_size,
        LossFunction::SparseCategoricalCrossEntropy,
        Metric::Accuracy,
    )
    .dense(64, Activation::ReLU)
    .dropout(0.2)
    .dense(32, Activation::ReLU)
    .dropout(0.1)
    .dense(16, Activation::ReLU)
    .dense(num_classes, Activation::Softmax)
}

/// Train the risk classifier; `data` targets are class ids stored as floats
pub fn train_burnout_classifier(
    data: &DataSplit,
    num_classes: usize,
    config: &TrainingConfig,
) -> Result<TrainedModel, PipelineError> {
    if let Some(&bad) = data
        .y_train
        .iter()
        .chain(data.y_test.iter())
        .find(|&&y| !y.is_finite() || y < 0.0 || y.fract() != 0.0 || y as usize >= num_classes)
    {
        return Err(PipelineError::InvalidClassId {
            value: bad,
            num_classes,
        });
    }

    let mut network = NeuralNetwork::new(
        classifier_config(data.x_train.ncols(), num_classes),
        config.seed,
    );
    tracing::info!(
        inputs = network.input_size(),
        outputs = network.output_size(),
        params = network.num_parameters(),
        "training classifier"
    );

    let history = fit(&mut network, data, config, CLASSIFICATION_TITLE)?;
    Ok(TrainedModel { network, history })
}
