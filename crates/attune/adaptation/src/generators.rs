//! Candidate generators.
//!
//! Four generators propose adaptation bundles from different perspectives:
//! 1. **Rule**: declarative mood rules
//! 2. **Predictive**: whatever the configured model suggests
//! 3. **Contextual**: time of day and page keywords
//! 4. **Historical**: bundles that worked in similar past contexts
//!
//! Generators are pure over the [`GenerationInput`] they are handed.

use attune_types::{
    Adaptation, AdaptationCandidate, CandidateSource, Context, FeatureVector, HistoryRecord,
    MoodState, UserProfile,
};
use serde::{Deserialize, Serialize};

use crate::model::PredictiveModel;
use crate::rules::RuleTable;

// ── Configuration ───────────────────────────────────────────────────────

/// Inclusive hour range considered night. Wraps past midnight when
/// `start_hour > end_hour`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start_hour: 22,
            end_hour: 6,
        }
    }
}

impl NightWindow {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            (self.start_hour..=self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }
}

/// A fixed bundle emitted when the page identifier contains any keyword.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordBundle {
    pub keywords: Vec<String>,
    pub adaptations: Vec<Adaptation>,
    pub confidence: f64,
    pub reasoning: String,
}

/// Configuration for the contextual and historical generators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub night: NightWindow,
    pub night_confidence: f64,
    pub keyword_bundles: Vec<KeywordBundle>,
    /// Minimum cosine similarity for a past record to count as similar.
    pub similarity_threshold: f64,
    /// How many of the most similar records to consider.
    pub top_k: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            night: NightWindow::default(),
            night_confidence: 0.9,
            keyword_bundles: vec![KeywordBundle {
                keywords: vec!["work".into(), "productivity".into()],
                adaptations: vec![
                    Adaptation::layout("minimal_distractions"),
                    Adaptation::content("focus_mode"),
                ],
                confidence: 0.8,
                reasoning: "Work context detected".into(),
            }],
            similarity_threshold: 0.7,
            top_k: 5,
        }
    }
}

// ── Generator Trait ─────────────────────────────────────────────────────

/// Read-only view handed to every generator for one decision.
pub struct GenerationInput<'a> {
    pub context: &'a Context,
    pub features: FeatureVector,
    /// Ledger records, oldest first.
    pub history: &'a [&'a HistoryRecord],
    pub model: &'a dyn PredictiveModel,
}

/// Proposes adaptation candidates for a context.
pub trait CandidateGenerator: Send + Sync {
    fn generate(&self, input: &GenerationInput<'_>) -> Vec<AdaptationCandidate>;

    fn name(&self) -> &str;
}

/// Evaluate every rule against the mood state; one candidate per match.
///
/// Predicates only read the mood state today; the profile is unused.
pub fn match_rules(
    rules: &RuleTable,
    mood: &MoodState,
    _profile: &UserProfile,
) -> Vec<AdaptationCandidate> {
    rules
        .matching(mood)
        .map(|rule| {
            AdaptationCandidate::new(CandidateSource::Rule, rule.adaptations.clone(), rule.confidence)
                .with_reasoning(format!("Rule '{}' matched", rule.name))
        })
        .collect()
}

// ── 1. Rule Generator ───────────────────────────────────────────────────

pub struct RuleGenerator {
    table: RuleTable,
}

impl RuleGenerator {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

impl CandidateGenerator for RuleGenerator {
    fn generate(&self, input: &GenerationInput<'_>) -> Vec<AdaptationCandidate> {
        match_rules(&self.table, &input.context.mood, &input.context.profile)
    }

    fn name(&self) -> &str {
        "rule"
    }
}

// ── 2. Predictive Generator ─────────────────────────────────────────────

/// Forwards the feature vector to the engine's predictive model.
pub struct PredictiveGenerator;

impl CandidateGenerator for PredictiveGenerator {
    fn generate(&self, input: &GenerationInput<'_>) -> Vec<AdaptationCandidate> {
        input
            .model
            .predict(&input.features)
            .into_iter()
            .map(|mut c| {
                c.source = CandidateSource::Model;
                c
            })
            .collect()
    }

    fn name(&self) -> &str {
        "predictive"
    }
}

// ── 3. Contextual Generator ─────────────────────────────────────────────

pub struct ContextualGenerator {
    config: GenerationConfig,
}

impl ContextualGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }
}

impl CandidateGenerator for ContextualGenerator {
    fn generate(&self, input: &GenerationInput<'_>) -> Vec<AdaptationCandidate> {
        let mut candidates = Vec::new();

        if self.config.night.contains(input.context.hour()) {
            candidates.push(
                AdaptationCandidate::new(
                    CandidateSource::Context,
                    vec![
                        Adaptation::visual("dark_mode"),
                        Adaptation::visual("reduce_brightness").amount(0.8),
                    ],
                    self.config.night_confidence,
                )
                .with_reasoning("Night time - eye comfort"),
            );
        }

        let page = input.context.page_lower();
        if !page.is_empty() {
            for bundle in &self.config.keyword_bundles {
                let hit = bundle
                    .keywords
                    .iter()
                    .any(|k| page.contains(&k.to_ascii_lowercase()));
                if hit {
                    candidates.push(
                        AdaptationCandidate::new(
                            CandidateSource::Context,
                            bundle.adaptations.clone(),
                            bundle.confidence,
                        )
                        .with_reasoning(bundle.reasoning.clone()),
                    );
                }
            }
        }

        candidates
    }

    fn name(&self) -> &str {
        "contextual"
    }
}

// ── 4. Historical Generator ─────────────────────────────────────────────

/// Re-proposes bundles that received positive feedback in similar contexts.
pub struct HistoricalGenerator {
    similarity_threshold: f64,
    top_k: usize,
}

impl HistoricalGenerator {
    pub fn new(similarity_threshold: f64, top_k: usize) -> Self {
        Self {
            similarity_threshold,
            top_k,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.similarity_threshold, config.top_k)
    }

    /// Resolved records at or above the threshold, most similar first,
    /// at most `top_k`. Equal similarities keep ledger order.
    pub fn similar<'a>(
        &self,
        features: &FeatureVector,
        history: &[&'a HistoryRecord],
    ) -> Vec<(&'a HistoryRecord, f64)> {
        let mut similar: Vec<(&HistoryRecord, f64)> = history
            .iter()
            .filter(|r| r.is_resolved())
            .map(|r| (*r, features.cosine_similarity(&r.features)))
            .filter(|(_, sim)| *sim >= self.similarity_threshold)
            .collect();
        similar.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        similar.truncate(self.top_k);
        similar
    }
}

impl CandidateGenerator for HistoricalGenerator {
    fn generate(&self, input: &GenerationInput<'_>) -> Vec<AdaptationCandidate> {
        self.similar(&input.features, input.history)
            .into_iter()
            .filter(|(record, _)| record.was_positive() && !record.selected.is_empty())
            .map(|(record, similarity)| {
                AdaptationCandidate::new(
                    CandidateSource::History,
                    record.selected.clone(),
                    0.6 + 0.3 * similarity,
                )
                .with_reasoning(format!("Previous success in similar context ({})", record.id))
            })
            .collect()
    }

    fn name(&self) -> &str {
        "historical"
    }
}
