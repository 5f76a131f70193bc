use serde::{Serialize, Deserialize};

use crate::error::Result;

/// One recorded `(iteration, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub iteration: usize,
    pub value: f64,
}

/// Everything the training loop records at its validation points.
///
/// Accuracies are percentages; costs are cross-entropy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Cost of the training batch of the step that hit the validation point.
    pub train_costs: Vec<Sample>,
    /// Cost over the whole validation partition.
    pub validation_costs: Vec<Sample>,
    pub train_accuracies: Vec<Sample>,
    pub validation_accuracies: Vec<Sample>,
}

impl TrainingHistory {
    pub fn record(
        &mut self,
        iteration: usize,
        train_cost: f64,
        validation_cost: f64,
        train_accuracy: f64,
        validation_accuracy: f64,
    ) {
        self.train_costs.push(Sample { iteration, value: train_cost });
        self.validation_costs.push(Sample { iteration, value: validation_cost });
        self.train_accuracies.push(Sample { iteration, value: train_accuracy });
        self.validation_accuracies.push(Sample { iteration, value: validation_accuracy });
    }

    /// Number of validation points recorded.
    pub fn len(&self) -> usize {
        self.train_costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train_costs.is_empty()
    }

    /// Serializes the history to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
