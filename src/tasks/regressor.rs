//! Wellbeing index regressor

use crate::error::PipelineError;
use crate::model::{fit, Activation, LossFunction, Metric, NetworkConfig, NeuralNetwork, TrainingConfig};
use crate::pipeline::DataSplit;

use super::TrainedModel;

/// Chart and file title of the regression run
pub const REGRESSION_TITLE: &str = "Wellbeing_Regression";

/// 64 -> 32 -> 16 ReLU layers with dropout 0.2 after the first, one linear output.
///
/// The output is unbounded even though the target lives in 0-10.
pub fn regressor_config(input_size: usize) -> NetworkConfig {
    NetworkConfig::new(input_size, LossFunction::MeanSquaredError, Metric::MeanAbsoluteError)
        .dense(64, Activation::ReLU)
        .dropout(0.2)
        .dense(32, Activation::ReLU)
        .dense(16, Activation::ReLU)
        .dense(1, Activation::Linear)
}

pub fn train_wellbeing_regressor(
    data: &DataSplit,
    config: &TrainingConfig,
) -> Result<TrainedModel, PipelineError> {
    let mut network = NeuralNetwork::new(regressor_config(data.x_train.ncols()), config.seed);
    tracing::info!(
        inputs = network.input_size(),
        params = network.num_parameters(),
        "training regressor"
    );

    let history = fit(&mut network, data, config, REGRESSION_TITLE)?;
    Ok(TrainedModel { network, history })
}
