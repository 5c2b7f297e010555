//! Early stopping on validation loss

use super::layer::DenseLayer;

/// What the trainer should do after an epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochOutcome {
    Improved,
    Waiting,
    Stop,
}

/// Stops training once validation loss has not improved for `patience`
/// consecutive epochs.
///
/// An epoch improves when its loss is below `best - min_delta`. Weights of the
/// best epoch are only kept when `restore_best_weights` is set.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f64,
    restore_best_weights: bool,
    best_loss: f64,
    best_epoch: usize,
    wait: usize,
    best_layers: Option<Vec<DenseLayer>>,
}

impl EarlyStopping {
    pub fn new(patience: usize, min_delta: f64, restore_best_weights: bool) -> Self {
        Self {
            patience,
            min_delta: min_delta.abs(),
            restore_best_weights,
            best_loss: f64::INFINITY,
            best_epoch: 0,
            wait: 0,
            best_layers: None,
        }
    }

    /// Record the validation loss of `epoch` (one-based).
    ///
    /// `layers` is only cloned when it is a new best and weights are being kept.
    pub fn observe(&mut self, epoch: usize, val_loss: f64, layers: &[DenseLayer]) -> EpochOutcome {
        if val_loss < self.best_loss - self.min_delta {
            self.best_loss = val_loss;
            self.best_epoch = epoch;
            self.wait = 0;
            if self.restore_best_weights {
                self.best_layers = Some(layers.to_vec());
            }
            return EpochOutcome::Improved;
        }

        self.wait += 1;
        if self.wait >= self.patience {
            EpochOutcome::Stop
        } else {
            EpochOutcome::Waiting
        }
    }

    pub fn best_epoch(&self) -> usize {
        self.best_epoch
    }

    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }

    /// Weights of the best epoch, if they were kept
    pub fn take_best_layers(&mut self) -> Option<Vec<DenseLayer>> {
        self.best_layers.take()
    }
}
