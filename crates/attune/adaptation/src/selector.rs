//! Conflict-aware greedy selection over ranked candidates.

use attune_types::{Adaptation, AdaptationCandidate, CandidateSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Two action fragments that must never be applied to the same surface together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntagonistPair {
    pub first: String,
    pub second: String,
}

impl AntagonistPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    fn opposes(&self, x: &str, y: &str) -> bool {
        (x.contains(&self.first) && y.contains(&self.second))
            || (x.contains(&self.second) && y.contains(&self.first))
    }
}

/// Selection budget and conflict table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Selection stops once the accumulated weighted score reaches this.
    pub budget: f64,
    /// Factor applied to each accepted candidate's score.
    pub score_weight: f64,
    pub antagonists: Vec<AntagonistPair>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            budget: 0.8,
            score_weight: 0.3,
            antagonists: vec![
                AntagonistPair::new("increase_brightness", "reduce_brightness"),
                AntagonistPair::new("increase_contrast", "reduce_contrast"),
                AntagonistPair::new("dark_mode", "light_mode"),
                AntagonistPair::new("minimal_distractions", "rich_content"),
            ],
        }
    }
}

/// Greedily accepts the best non-conflicting candidates.
#[derive(Clone, Debug, Default)]
pub struct ConflictSelector {
    config: SelectionConfig,
}

impl ConflictSelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Whether two adaptations act on the same surface with antagonistic actions.
    pub fn adaptations_conflict(&self, a: &Adaptation, b: &Adaptation) -> bool {
        a.kind == b.kind
            && a.action != b.action
            && self
                .config
                .antagonists
                .iter()
                .any(|pair| pair.opposes(&a.action, &b.action))
    }

    /// Whether any adaptation of `candidate` conflicts with any in `accepted`.
    pub fn conflicts_with(&self, accepted: &[AdaptationCandidate], candidate: &AdaptationCandidate) -> bool {
        accepted.iter().any(|existing| {
            existing.adaptations.iter().any(|x| {
                candidate
                    .adaptations
                    .iter()
                    .any(|y| self.adaptations_conflict(x, y))
            })
        })
    }

    /// Walk `ranked` in order, accepting non-conflicting candidates until the
    /// budget is reached. Never returns an empty list.
    pub fn select(&self, ranked: Vec<AdaptationCandidate>) -> Vec<AdaptationCandidate> {
        let mut selected: Vec<AdaptationCandidate> = Vec::new();
        let mut spent = 0.0;

        for candidate in ranked {
            if spent >= self.config.budget {
                break;
            }
            if self.conflicts_with(&selected, &candidate) {
                debug!(source = ?candidate.source, "Skipping conflicting candidate");
                continue;
            }
            spent += candidate.score() * self.config.score_weight;
            selected.push(candidate);
        }

        if selected.is_empty() {
            selected.push(default_candidate());
        }
        selected
    }
}

/// The safe fallback used when nothing else was accepted.
pub fn default_candidate() -> AdaptationCandidate {
    AdaptationCandidate::new(
        CandidateSource::Default,
        vec![
            Adaptation::visual("balance_brightness"),
            Adaptation::layout("standard_layout"),
        ],
        0.5,
    )
    .with_reasoning("Default safe adaptation")
}
