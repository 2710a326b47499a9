//! Central pipeline engine.
//!
//! The `AttuneEngine` owns one instance of every pipeline stage:
//! readings → fusion → generators → scorer → selector → ledger.

use attune_adaptation::{
    CandidateGenerator, CandidateScorer, ConflictSelector, ContextualGenerator, GenerationInput,
    HistoricalGenerator, ModelMetrics, PredictiveGenerator, PredictiveModel, RuleGenerator,
    RuleTable,
};
use attune_fusion::{MoodTrends, SignalFusion};
use attune_learning::{FeedbackLedger, FeedbackReceipt};
use attune_types::{
    AdaptationCandidate, ChannelReading, Context, FeatureVector, Feedback, MoodState, RecordId,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AttuneConfig;
use crate::error::{AttuneError, AttuneResult};

/// The outcome of one decision cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Ledger record to attach feedback to.
    pub record_id: RecordId,
    /// Accepted candidates, best first. Never empty.
    pub selected: Vec<AdaptationCandidate>,
}

/// Mood-aware adaptation engine.
pub struct AttuneEngine {
    fusion: SignalFusion,
    generators: Vec<Box<dyn CandidateGenerator>>,
    scorer: CandidateScorer,
    selector: ConflictSelector,
    ledger: FeedbackLedger,
    model: Box<dyn PredictiveModel>,
    config: AttuneConfig,
}

impl AttuneEngine {
    /// Build from configuration: rules from `rules_path` or the built-in
    /// table, model from `model`.
    pub fn new(config: AttuneConfig) -> AttuneResult<Self> {
        let rules = match &config.rules_path {
            Some(path) => load_rules(path)?,
            None => RuleTable::builtin(),
        };
        let model = config.model.build();
        Self::with_parts(config, rules, model)
    }

    /// Build with an explicit rule table and model.
    pub fn with_parts(
        config: AttuneConfig,
        rules: RuleTable,
        model: Box<dyn PredictiveModel>,
    ) -> AttuneResult<Self> {
        let generators: Vec<Box<dyn CandidateGenerator>> = vec![
            Box::new(RuleGenerator::new(rules)),
            Box::new(PredictiveGenerator),
            Box::new(ContextualGenerator::new(config.generation.clone())),
            Box::new(HistoricalGenerator::from_config(&config.generation)),
        ];
        Self::with_generators(config, generators, model)
    }

    /// Build with custom generators.
    pub fn with_generators(
        config: AttuneConfig,
        generators: Vec<Box<dyn CandidateGenerator>>,
        model: Box<dyn PredictiveModel>,
    ) -> AttuneResult<Self> {
        config.validate()?;
        info!(
            generators = generators.len(),
            model = model.name(),
            "Attune engine initialised"
        );
        Ok(Self {
            fusion: SignalFusion::new(config.fusion.clone()),
            generators,
            scorer: CandidateScorer::new(config.scoring.clone(), config.generation.night),
            selector: ConflictSelector::new(config.selection.clone()),
            ledger: FeedbackLedger::new(config.learning.clone()),
            model,
            config,
        })
    }

    // ── Fusion ──────────────────────────────────────────────────────────

    /// Fuse one batch of channel readings into a mood state.
    pub fn fuse(&mut self, readings: &[ChannelReading]) -> MoodState {
        self.fusion.fuse(readings)
    }

    pub fn fuse_at(&mut self, readings: &[ChannelReading], at: DateTime<Utc>) -> MoodState {
        self.fusion.fuse_at(readings, at)
    }

    /// Mood aggregated over the configured window.
    pub fn current_mood(&self) -> MoodState {
        self.fusion.current_mood()
    }

    pub fn current_mood_within(&self, window: Duration) -> MoodState {
        self.fusion.current_mood_at(window, Utc::now())
    }

    /// Trends over the configured trend window; `None` with fewer than two states.
    pub fn mood_trends(&self) -> Option<MoodTrends> {
        self.fusion.mood_trends()
    }

    pub fn mood_trends_within(&self, window: Duration) -> Option<MoodTrends> {
        self.fusion.mood_trends_at(window, Utc::now())
    }

    // ── Decision ────────────────────────────────────────────────────────

    /// Run one generate → score → select → record cycle.
    pub fn decide(&mut self, context: &Context) -> Decision {
        self.decide_at(context, Utc::now())
    }

    pub fn decide_at(&mut self, context: &Context, at: DateTime<Utc>) -> Decision {
        let history = self.ledger.history_view();
        let input = GenerationInput {
            context,
            features: FeatureVector::from_context(context),
            history: &history,
            model: self.model.as_ref(),
        };

        let mut candidates = Vec::new();
        for gen in &self.generators {
            let generated = gen.generate(&input);
            debug!(
                generator = gen.name(),
                count = generated.len(),
                "Generated candidates"
            );
            candidates.extend(generated);
        }

        let ranked = self.scorer.rank(candidates, context, &self.ledger);
        let selected = self.selector.select(ranked);
        let record_id = self.ledger.record_at(context, &selected, at);

        info!(
            record = %record_id,
            mood = %context.mood.primary_mood,
            selected = selected.len(),
            "Decision recorded"
        );
        Decision {
            record_id,
            selected,
        }
    }

    // ── Learning ────────────────────────────────────────────────────────

    /// Attach feedback to a recorded decision.
    pub fn apply_feedback(&mut self, record_id: &RecordId, feedback: Feedback) -> FeedbackReceipt {
        self.ledger
            .apply_feedback(record_id, feedback, self.model.as_mut())
    }

    /// Evaluate the model against the current training corpus.
    pub fn evaluate_model(&self) -> ModelMetrics {
        self.ledger.evaluate(self.model.as_ref())
    }

    /// Clear ledger and mood history. Configuration and model stay.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.fusion.reset();
        info!("Attune engine reset");
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &AttuneConfig {
        &self.config
    }

    pub fn ledger(&self) -> &FeedbackLedger {
        &self.ledger
    }

    pub fn fusion(&self) -> &SignalFusion {
        &self.fusion
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}

fn load_rules(path: &str) -> AttuneResult<RuleTable> {
    let json = std::fs::read_to_string(path).map_err(|source| AttuneError::RuleFileIo {
        path: path.to_string(),
        source,
    })?;
    let table = RuleTable::from_json(&json)?;
    info!(path, rules = table.len(), "Loaded rule table");
    Ok(table)
}
