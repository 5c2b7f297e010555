//! Per-epoch training log

use serde::Serialize;

use super::loss::Metric;

/// Loss and metric of one epoch on both partitions
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EpochLog {
    /// One-based epoch number
    pub epoch: usize,
    pub loss: f64,
    pub metric: f64,
    pub val_loss: f64,
    pub val_metric: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingHistory {
    pub metric: Metric,
    pub epochs: Vec<EpochLog>,
    /// Epoch with the lowest validation loss
    pub best_epoch: usize,
    /// Set when early stopping ended the run before the epoch cap
    pub stopped_epoch: Option<usize>,
    /// Whether the final weights are the ones from `best_epoch`
    pub restored_best_weights: bool,
}

impl TrainingHistory {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            epochs: Vec::new(),
            best_epoch: 0,
            stopped_epoch: None,
            restored_best_weights: false,
        }
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn loss(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.loss).collect()
    }

    pub fn val_loss(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.val_loss).collect()
    }

    pub fn metric_values(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.metric).collect()
    }

    pub fn val_metric_values(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.val_metric).collect()
    }

    pub fn last(&self) -> Option<&EpochLog> {
        self.epochs.last()
    }
}
