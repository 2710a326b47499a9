//! Pluggable predictive scorer.
//!
//! A [`PredictiveModel`] proposes candidates from a feature vector and may
//! learn from the training corpus the ledger accumulates. Three variants
//! ship with the crate, chosen at construction through [`ModelKind`].

use std::collections::{BTreeMap, HashMap};

use attune_types::{
    Adaptation, AdaptationCandidate, CandidateSource, FeatureVector, PatternKey, TrainingExample,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Summary of how well a model fits a corpus.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: Option<f64>,
    pub loss: Option<f64>,
    /// Number of examples the metrics were computed over.
    pub samples: usize,
}

impl ModelMetrics {
    /// Metrics for a model that has nothing to report.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Capability interface for predictive scorers.
pub trait PredictiveModel: Send + Sync {
    /// Model name for logging.
    fn name(&self) -> &str;

    /// Propose candidates for the given features.
    fn predict(&self, features: &FeatureVector) -> Vec<AdaptationCandidate>;

    /// Refit on the full corpus, oldest example first.
    fn train(&mut self, corpus: &[&TrainingExample]);

    /// Measure fit against a corpus.
    fn evaluate(&self, corpus: &[&TrainingExample]) -> ModelMetrics;
}

/// Which predictive model an engine is built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Heuristic,
    Lookup,
    Disabled,
}

impl ModelKind {
    pub fn build(&self) -> Box<dyn PredictiveModel> {
        match self {
            Self::Heuristic => Box::new(HeuristicModel),
            Self::Lookup => Box::new(LookupTableModel::default()),
            Self::Disabled => Box::new(DisabledModel),
        }
    }
}

// ── Heuristic ───────────────────────────────────────────────────────────

/// Baseline model: always proposes a gentle brightness adjustment.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicModel;

impl PredictiveModel for HeuristicModel {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn predict(&self, _features: &FeatureVector) -> Vec<AdaptationCandidate> {
        vec![AdaptationCandidate::new(
            CandidateSource::Model,
            vec![Adaptation::visual("adjust_brightness")],
            0.6,
        )
        .with_reasoning("Basic prediction")]
    }

    fn train(&mut self, corpus: &[&TrainingExample]) {
        debug!(examples = corpus.len(), "Heuristic model has nothing to fit");
    }

    fn evaluate(&self, corpus: &[&TrainingExample]) -> ModelMetrics {
        ModelMetrics {
            accuracy: Some(0.7),
            loss: Some(0.3),
            samples: corpus.len(),
        }
    }
}

// ── Disabled ────────────────────────────────────────────────────────────

/// No-op fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledModel;

impl PredictiveModel for DisabledModel {
    fn name(&self) -> &str {
        "disabled"
    }

    fn predict(&self, _features: &FeatureVector) -> Vec<AdaptationCandidate> {
        Vec::new()
    }

    fn train(&mut self, _corpus: &[&TrainingExample]) {}

    fn evaluate(&self, _corpus: &[&TrainingExample]) -> ModelMetrics {
        ModelMetrics::empty()
    }
}

// ── Lookup Table ────────────────────────────────────────────────────────

/// Best-known bundle for one mood.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupEntry {
    pub adaptations: Vec<Adaptation>,
    /// Laplace-smoothed success rate of the bundle.
    pub rate: f64,
    pub observations: u64,
}

/// Learns, per mood, which previously chosen bundle worked best.
#[derive(Clone, Debug, Default)]
pub struct LookupTableModel {
    table: HashMap<i64, LookupEntry>,
}

/// Mood codes are multiples of 0.1; bucket on that grid.
fn mood_bucket(code: f64) -> i64 {
    (code * 10.0).round() as i64
}

fn bundle_key(adaptations: &[Adaptation]) -> Vec<PatternKey> {
    let mut keys: Vec<PatternKey> = adaptations.iter().map(PatternKey::of).collect();
    keys.sort();
    keys
}

impl LookupTableModel {
    pub fn entry_for(&self, features: &FeatureVector) -> Option<&LookupEntry> {
        self.table.get(&mood_bucket(features.mood_code()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl PredictiveModel for LookupTableModel {
    fn name(&self) -> &str {
        "lookup"
    }

    fn predict(&self, features: &FeatureVector) -> Vec<AdaptationCandidate> {
        match self.entry_for(features) {
            Some(entry) if !entry.adaptations.is_empty() => vec![AdaptationCandidate::new(
                CandidateSource::Model,
                entry.adaptations.clone(),
                entry.rate,
            )
            .with_reasoning(format!(
                "Learned from {} outcomes in this mood",
                entry.observations
            ))],
            _ => Vec::new(),
        }
    }

    fn train(&mut self, corpus: &[&TrainingExample]) {
        // bucket -> bundle -> (example bundle, attempts, successes)
        let mut tallies: HashMap<i64, BTreeMap<Vec<PatternKey>, (Vec<Adaptation>, u64, u64)>> =
            HashMap::new();
        for example in corpus {
            let slot = tallies
                .entry(mood_bucket(example.features.mood_code()))
                .or_default()
                .entry(bundle_key(&example.chosen))
                .or_insert_with(|| (example.chosen.clone(), 0, 0));
            slot.1 += 1;
            if example.success {
                slot.2 += 1;
            }
        }

        self.table.clear();
        for (bucket, bundles) in tallies {
            // Full ties go to the smallest bundle key.
            let best = bundles
                .into_iter()
                .map(|(key, (adaptations, attempts, successes))| {
                    let entry = LookupEntry {
                        adaptations,
                        rate: (successes as f64 + 1.0) / (attempts as f64 + 2.0),
                        observations: attempts,
                    };
                    (key, entry)
                })
                .max_by(|(ka, a), (kb, b)| {
                    a.rate
                        .partial_cmp(&b.rate)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.observations.cmp(&b.observations))
                        .then_with(|| kb.cmp(ka))
                });
            if let Some((_, entry)) = best {
                self.table.insert(bucket, entry);
            }
        }
        debug!(examples = corpus.len(), moods = self.table.len(), "Lookup model trained");
    }

    fn evaluate(&self, corpus: &[&TrainingExample]) -> ModelMetrics {
        let mut considered = 0usize;
        let mut agreed = 0usize;
        for example in corpus {
            if let Some(entry) = self.entry_for(&example.features) {
                considered += 1;
                if (entry.rate >= 0.5) == example.success {
                    agreed += 1;
                }
            }
        }
        if considered == 0 {
            return ModelMetrics::empty();
        }
        let accuracy = agreed as f64 / considered as f64;
        ModelMetrics {
            accuracy: Some(accuracy),
            loss: Some(1.0 - accuracy),
            samples: considered,
        }
    }
}
