use serde::{Deserialize, Serialize};

/// Capacities and retraining cadence for the feedback ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Maximum decision records retained.
    pub record_capacity: usize,
    /// Maximum training examples retained.
    pub corpus_capacity: usize,
    /// Retrain the model after this many appended examples.
    pub retrain_interval: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            record_capacity: 500,
            corpus_capacity: 1000,
            retrain_interval: 50,
        }
    }
}
