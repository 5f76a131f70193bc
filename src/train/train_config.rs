use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::dims::LayerDims;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `layer_dims`         : widths of every layer, input first
/// - `learning_rate`      : gradient-descent step size, must be positive
/// - `epochs`             : full passes over the training partition
/// - `batch_size`         : examples per mini-batch; the trailing partial
///                           batch of every epoch is dropped
/// - `use_batchnorm`      : normalize every hidden output per batch
/// - `keep_prob`          : dropout keep-probability in `(0, 1]`; `1` disables
///                           dropout
/// - `seed`               : seeds initialization, the split and dropout masks
/// - `validation_fraction`: share of the examples held out for validation
/// - `validation_interval`: iterations between two validation points
/// - `early_stopping`     : plateau detection on the validation cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub layer_dims: LayerDims,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    #[serde(default)]
    pub use_batchnorm: bool,
    #[serde(default = "default_keep_prob")]
    pub keep_prob: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_validation_fraction")]
    pub validation_fraction: f64,
    #[serde(default = "default_validation_interval")]
    pub validation_interval: usize,
    #[serde(default)]
    pub early_stopping: EarlyStoppingConfig,
}

/// Stop once the validation cost improves by less than `min_delta` between
/// two validation points, but only after `min_iterations`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarlyStoppingConfig {
    #[serde(default = "default_min_delta")]
    pub min_delta: f64,
    #[serde(default = "default_min_iterations")]
    pub min_iterations: usize,
}

fn default_keep_prob() -> f64 { 1.0 }
fn default_seed() -> u64 { 42 }
fn default_validation_fraction() -> f64 { 0.2 }
fn default_validation_interval() -> usize { 100 }
fn default_min_delta() -> f64 { 1e-10 }
fn default_min_iterations() -> usize { 18_000 }

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        EarlyStoppingConfig {
            min_delta: default_min_delta(),
            min_iterations: default_min_iterations(),
        }
    }
}

impl TrainConfig {
    /// Creates a config with the default seed, split, validation cadence and
    /// early-stopping rule.
    pub fn new(
        layer_dims: LayerDims,
        learning_rate: f64,
        epochs: usize,
        batch_size: usize,
        use_batchnorm: bool,
        keep_prob: f64,
    ) -> Self {
        TrainConfig {
            layer_dims,
            learning_rate,
            epochs,
            batch_size,
            use_batchnorm,
            keep_prob,
            seed: default_seed(),
            validation_fraction: default_validation_fraction(),
            validation_interval: default_validation_interval(),
            early_stopping: EarlyStoppingConfig::default(),
        }
    }

    /// Checks every knob that does not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0) || !self.learning_rate.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".to_owned()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".to_owned()));
        }
        if !(self.keep_prob > 0.0 && self.keep_prob <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "keep_prob must lie in (0, 1], got {}",
                self.keep_prob
            )));
        }
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "validation_fraction must lie in (0, 1), got {}",
                self.validation_fraction
            )));
        }
        if self.validation_interval == 0 {
            return Err(Error::InvalidConfig(
                "validation_interval must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Checks the mini-batch fits in the training partition.
    pub fn validate_for_training_set(&self, n_train: usize) -> Result<()> {
        if self.batch_size > n_train {
            return Err(Error::InvalidConfig(format!(
                "batch_size {} exceeds the {} training examples",
                self.batch_size, n_train
            )));
        }
        Ok(())
    }

    /// Deserializes a `TrainConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
