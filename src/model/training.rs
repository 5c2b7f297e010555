//! Mini-batch training loop with early stopping

use indicatif::ProgressBar;
use ndarray::Axis;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::early_stopping::{EarlyStopping, EpochOutcome};
use super::history::{EpochLog, TrainingHistory};
use super::network::NeuralNetwork;
use super::optimizer::Adam;
use crate::error::PipelineError;
use crate::pipeline::DataSplit;
use crate::utils::create_progress_bar;

/// Hyper-parameters shared by both trainers
#[derive(Debug, Clone, Serialize)]
pub struct TrainingConfig {
    /// Epoch cap
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Epochs without validation improvement before stopping
    pub patience: usize,
    pub min_delta: f64,
    pub restore_best_weights: bool,
    /// Seeds weight init, shuffling and dropout
    pub seed: u64,
    #[serde(skip)]
    pub show_progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch_size: 32,
            learning_rate: 0.001,
            patience: 10,
            min_delta: 0.0,
            restore_best_weights: false,
            seed: 42,
            show_progress: true,
        }
    }
}

/// Train `network` on the training partition, validating on the test partition.
///
/// Each epoch shuffles the training rows, runs Adam over mini-batches and then
/// evaluates both partitions. Training ends at `config.epochs` or when early
/// stopping triggers. Train loss/metric are batch averages taken with dropout
/// active; validation values are computed without dropout.
pub fn fit(
    network: &mut NeuralNetwork,
    data: &DataSplit,
    config: &TrainingConfig,
    name: &str,
) -> Result<TrainingHistory, PipelineError> {
    let n_train = data.x_train.nrows();
    if n_train != data.y_train.len() {
        return Err(PipelineError::ShapeMismatch {
            context: format!("{} training targets", name),
            expected: n_train,
            actual: data.y_train.len(),
        });
    }
    if data.x_train.ncols() != network.input_size() {
        return Err(PipelineError::ShapeMismatch {
            context: format!("{} training features", name),
            expected: network.input_size(),
            actual: data.x_train.ncols(),
        });
    }
    if n_train == 0 {
        return Err(PipelineError::EmptyDataset);
    }

    let metric = network.config().metric;
    let loss_fn = network.config().loss;
    let batch_size = config.batch_size.max(1);

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let mut optimizer = Adam::new(config.learning_rate);
    let mut early_stopping = EarlyStopping::new(config.patience, config.min_delta, config.restore_best_weights);
    let mut history = TrainingHistory::new(metric);
    let mut indices: Vec<usize> = (0..n_train).collect();

    let pb = if config.show_progress {
        create_progress_bar(config.epochs as u64, name)
    } else {
        ProgressBar::hidden()
    };

    for epoch in 1..=config.epochs {
        indices.shuffle(&mut rng);

        let mut loss_sum = 0.0;
        let mut metric_sum = 0.0;

        for batch in indices.chunks(batch_size) {
            let x = data.x_train.select(Axis(0), batch);
            let y = data.y_train.select(Axis(0), batch);

            let (outputs, caches) = network.forward_train(&x, &mut rng);
            loss_sum += loss_fn.compute(&outputs, &y) * batch.len() as f64;
            metric_sum += metric.compute(&outputs, &y) * batch.len() as f64;

            let gradients = network.backward(&outputs, &y, &caches);
            optimizer.step(network.layers_mut(), &gradients);
        }

        let loss = loss_sum / n_train as f64;
        let train_metric = metric_sum / n_train as f64;
        let (val_loss, val_metric) = network.evaluate(&data.x_test, &data.y_test)?;

        if !loss.is_finite() || !val_loss.is_finite() {
            pb.abandon();
            return Err(PipelineError::NonFiniteLoss {
                model: name.to_string(),
                epoch,
            });
        }

        history.epochs.push(EpochLog {
            epoch,
            loss,
            metric: train_metric,
            val_loss,
            val_metric,
        });

        tracing::debug!(
            model = name,
            epoch,
            loss,
            val_loss,
            metric = metric.name(),
            train_metric,
            val_metric,
            "epoch complete"
        );
        pb.set_message(format!(
            "{} loss {:.4} val_loss {:.4} val_{} {:.4}",
            name,
            loss,
            val_loss,
            metric.name(),
            val_metric
        ));
        pb.inc(1);

        if early_stopping.observe(epoch, val_loss, network.layers()) == EpochOutcome::Stop {
            history.stopped_epoch = Some(epoch);
            tracing::info!(
                model = name,
                epoch,
                best_epoch = early_stopping.best_epoch(),
                "early stopping"
            );
            break;
        }
    }

    history.best_epoch = early_stopping.best_epoch();
    if let Some(best) = early_stopping.take_best_layers() {
        network.set_layers(best);
        history.restored_best_weights = true;
    }

    pb.finish_with_message(format!(
        "✅ {} trained for {} epoch(s), best val_loss {:.4} at epoch {}",
        name,
        history.len(),
        early_stopping.best_loss(),
        history.best_epoch
    ));

    Ok(history)
}
