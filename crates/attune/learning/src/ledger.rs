//! The feedback ledger.
//!
//! Owns every decision record, the per-adaptation success patterns and the
//! bounded training corpus. Feedback resolves a record exactly once; each
//! resolution appends one training example, and every `retrain_interval`
//! appended examples the predictive model is retrained on the full corpus.

use std::collections::HashMap;

use attune_adaptation::{ModelMetrics, PredictiveModel, SuccessRates};
use attune_types::{
    Adaptation, AdaptationCandidate, BoundedLog, Context, Feedback, FeatureVector, HistoryRecord,
    Outcome, PatternKey, RecordId, SuccessPattern, TrainingExample,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LearningConfig;

/// What happened to a piece of feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackReceipt {
    /// Outcome stored and statistics updated.
    Applied { retrained: bool },
    /// No such record (never recorded, or already evicted). Nothing changed.
    UnknownRecord,
    /// The record already has an outcome. Nothing changed.
    AlreadyResolved,
}

impl FeedbackReceipt {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Decision records, success statistics and training corpus.
pub struct FeedbackLedger {
    config: LearningConfig,
    records: BoundedLog<HistoryRecord>,
    patterns: HashMap<PatternKey, SuccessPattern>,
    corpus: BoundedLog<TrainingExample>,
    /// Examples appended since construction or the last reset.
    appended: u64,
}

impl FeedbackLedger {
    pub fn new(config: LearningConfig) -> Self {
        Self {
            records: BoundedLog::new(config.record_capacity),
            corpus: BoundedLog::new(config.corpus_capacity),
            patterns: HashMap::new(),
            appended: 0,
            config,
        }
    }

    /// Store a decision with an unset outcome.
    pub fn record(&mut self, context: &Context, selected: &[AdaptationCandidate]) -> RecordId {
        self.record_at(context, selected, Utc::now())
    }

    pub fn record_at(
        &mut self,
        context: &Context,
        selected: &[AdaptationCandidate],
        at: DateTime<Utc>,
    ) -> RecordId {
        let snapshot = context.snapshot();
        let record = HistoryRecord {
            id: RecordId::new(),
            recorded_at: at,
            features: FeatureVector::from_snapshot(&snapshot),
            snapshot,
            selected: selected
                .iter()
                .flat_map(|c| c.adaptations.iter().cloned())
                .collect(),
            outcome: None,
        };
        let id = record.id.clone();
        if let Some(evicted) = self.records.push(record) {
            debug!(record = %evicted.id, "Evicted oldest decision record");
        }
        id
    }

    /// Attach feedback to a record and learn from it.
    pub fn apply_feedback(
        &mut self,
        id: &RecordId,
        feedback: Feedback,
        model: &mut dyn PredictiveModel,
    ) -> FeedbackReceipt {
        self.apply_feedback_at(id, feedback, model, Utc::now())
    }

    pub fn apply_feedback_at(
        &mut self,
        id: &RecordId,
        feedback: Feedback,
        model: &mut dyn PredictiveModel,
        at: DateTime<Utc>,
    ) -> FeedbackReceipt {
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id) else {
            debug!(record = %id, "Feedback for unknown record ignored");
            return FeedbackReceipt::UnknownRecord;
        };
        if record.outcome.is_some() {
            debug!(record = %id, "Record already resolved");
            return FeedbackReceipt::AlreadyResolved;
        }

        record.outcome = Some(Outcome {
            feedback: feedback.clone(),
            received_at: at,
        });
        let features = record.features;
        let chosen: Vec<Adaptation> = record.selected.clone();

        for adaptation in &chosen {
            self.patterns
                .entry(PatternKey::of(adaptation))
                .or_default()
                .record(feedback.positive);
        }

        self.corpus.push(TrainingExample {
            features,
            chosen,
            success: feedback.positive,
            rating: feedback.rating.unwrap_or(0.5),
        });
        self.appended += 1;

        let retrained = self.config.retrain_interval > 0 && self.appended % self.config.retrain_interval == 0;
        if retrained {
            let corpus: Vec<&TrainingExample> = self.corpus.iter().collect();
            model.train(&corpus);
            info!(
                model = model.name(),
                examples = corpus.len(),
                appended = self.appended,
                "Retrained predictive model"
            );
        }

        FeedbackReceipt::Applied { retrained }
    }

    /// Rate for one adaptation, 0.5 if never attempted.
    pub fn success_rate(&self, adaptation: &Adaptation) -> f64 {
        self.patterns.rate(adaptation)
    }

    /// Run the model's evaluation over the current corpus.
    pub fn evaluate(&self, model: &dyn PredictiveModel) -> ModelMetrics {
        let corpus: Vec<&TrainingExample> = self.corpus.iter().collect();
        model.evaluate(&corpus)
    }

    pub fn get(&self, id: &RecordId) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn records(&self) -> &BoundedLog<HistoryRecord> {
        &self.records
    }

    /// Records as a slice-compatible view, oldest first.
    pub fn history_view(&self) -> Vec<&HistoryRecord> {
        self.records.iter().collect()
    }

    pub fn patterns(&self) -> &HashMap<PatternKey, SuccessPattern> {
        &self.patterns
    }

    pub fn corpus(&self) -> &BoundedLog<TrainingExample> {
        &self.corpus
    }

    /// Total examples appended since construction or the last reset.
    pub fn examples_appended(&self) -> u64 {
        self.appended
    }

    /// Drop records, patterns and corpus.
    pub fn reset(&mut self) {
        self.records.clear();
        self.patterns.clear();
        self.corpus.clear();
        self.appended = 0;
    }
}

impl Default for FeedbackLedger {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}

impl SuccessRates for FeedbackLedger {
    fn rate(&self, adaptation: &Adaptation) -> f64 {
        self.success_rate(adaptation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attune_adaptation::{DisabledModel, HeuristicModel};
    use attune_types::{CandidateSource, Mood, MoodState, UserProfile};
    use chrono::NaiveDate;

    /// Counts `train` calls.
    #[derive(Default)]
    struct CountingModel {
        trained: usize,
        last_corpus: usize,
    }

    impl PredictiveModel for CountingModel {
        fn name(&self) -> &str {
            "counting"
        }
        fn predict(&self, _features: &FeatureVector) -> Vec<AdaptationCandidate> {
            Vec::new()
        }
        fn train(&mut self, corpus: &[&TrainingExample]) {
            self.trained += 1;
            self.last_corpus = corpus.len();
        }
        fn evaluate(&self, _corpus: &[&TrainingExample]) -> ModelMetrics {
            ModelMetrics::empty()
        }
    }

    fn make_context() -> Context {
        Context::new(
            MoodState::with_scalars(Mood::Stressed, 0.8, 0.7, 0.3, 0.9),
            UserProfile::default(),
            NaiveDate::from_ymd_opt(2024, 4, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    fn selection(actions: &[&str]) -> Vec<AdaptationCandidate> {
        vec![AdaptationCandidate::new(
            CandidateSource::Rule,
            actions.iter().map(|a| Adaptation::visual(*a)).collect(),
            0.8,
        )]
    }

    #[test]
    fn record_stores_flattened_selection() {
        let mut ledger = FeedbackLedger::default();
        let id = ledger.record(&make_context(), &selection(&["dark_mode", "reduce_brightness"]));
        let record = ledger.get(&id).unwrap();
        assert_eq!(record.selected.len(), 2);
        assert!(record.outcome.is_none());
        assert_eq!(record.features, FeatureVector::from_context(&make_context()));
    }

    #[test]
    fn positive_and_negative_feedback_update_patterns() {
        let mut ledger = FeedbackLedger::default();
        let mut model = DisabledModel;
        let a = ledger.record(&make_context(), &selection(&["dark_mode"]));
        let b = ledger.record(&make_context(), &selection(&["dark_mode"]));

        assert!(ledger.apply_feedback(&a, Feedback::positive(), &mut model).is_applied());
        assert!(ledger.apply_feedback(&b, Feedback::negative(), &mut model).is_applied());

        let key = PatternKey::of(&Adaptation::visual("dark_mode"));
        let pattern = ledger.patterns()[&key];
        assert_eq!(pattern.attempts, 2);
        assert_eq!(pattern.successes, 1);
        assert!((ledger.success_rate(&Adaptation::visual("dark_mode")) - 0.5).abs() < f64::EPSILON);
        assert_eq!(ledger.success_rate(&Adaptation::visual("never_seen")), 0.5);
        assert_eq!(ledger.corpus().len(), 2);
        assert_eq!(ledger.corpus().latest().unwrap().rating, 0.5);
    }

    #[test]
    fn unknown_record_changes_nothing() {
        let mut ledger = FeedbackLedger::default();
        let mut model = DisabledModel;
        ledger.record(&make_context(), &selection(&["dark_mode"]));
        let receipt = ledger.apply_feedback(&RecordId("missing".into()), Feedback::positive(), &mut model);
        assert_eq!(receipt, FeedbackReceipt::UnknownRecord);
        assert!(ledger.patterns().is_empty());
        assert!(ledger.corpus().is_empty());
        assert!(ledger.records().iter().all(|r| r.outcome.is_none()));
    }

    #[test]
    fn outcome_set_only_once() {
        let mut ledger = FeedbackLedger::default();
        let mut model = DisabledModel;
        let id = ledger.record(&make_context(), &selection(&["dark_mode"]));
        ledger.apply_feedback(&id, Feedback::positive().with_rating(0.9), &mut model);
        let second = ledger.apply_feedback(&id, Feedback::negative(), &mut model);
        assert_eq!(second, FeedbackReceipt::AlreadyResolved);
        let record = ledger.get(&id).unwrap();
        assert!(record.was_positive());
        assert_eq!(record.outcome.as_ref().unwrap().feedback.rating, Some(0.9));
        assert_eq!(ledger.corpus().len(), 1);
    }

    #[test]
    fn retrains_every_interval() {
        let mut ledger = FeedbackLedger::default();
        let mut model = CountingModel::default();
        for i in 0..120 {
            let id = ledger.record(&make_context(), &selection(&["dark_mode"]));
            let receipt = ledger.apply_feedback(&id, Feedback::positive(), &mut model);
            let expected = (i + 1) % 50 == 0;
            assert_eq!(receipt, FeedbackReceipt::Applied { retrained: expected });
        }
        assert_eq!(model.trained, 2);
        assert_eq!(model.last_corpus, 100);
    }

    #[test]
    fn retraining_continues_after_corpus_saturates() {
        let mut ledger = FeedbackLedger::new(LearningConfig {
            record_capacity: 10,
            corpus_capacity: 20,
            retrain_interval: 5,
        });
        let mut model = CountingModel::default();
        for _ in 0..40 {
            let id = ledger.record(&make_context(), &selection(&["dark_mode"]));
            ledger.apply_feedback(&id, Feedback::negative(), &mut model);
        }
        assert_eq!(model.trained, 8);
        assert_eq!(ledger.corpus().len(), 20);
        assert_eq!(ledger.records().len(), 10);
        assert_eq!(ledger.examples_appended(), 40);
    }

    #[test]
    fn evicted_record_feedback_is_noop() {
        let mut ledger = FeedbackLedger::new(LearningConfig {
            record_capacity: 2,
            ..LearningConfig::default()
        });
        let mut model = DisabledModel;
        let first = ledger.record(&make_context(), &selection(&["a"]));
        ledger.record(&make_context(), &selection(&["b"]));
        ledger.record(&make_context(), &selection(&["c"]));
        assert_eq!(
            ledger.apply_feedback(&first, Feedback::positive(), &mut model),
            FeedbackReceipt::UnknownRecord
        );
    }

    #[test]
    fn evaluate_and_reset() {
        let mut ledger = FeedbackLedger::default();
        let mut model = HeuristicModel;
        let id = ledger.record(&make_context(), &selection(&["dark_mode"]));
        ledger.apply_feedback(&id, Feedback::positive(), &mut model);
        let metrics = ledger.evaluate(&model);
        assert_eq!(metrics.samples, 1);
        assert_eq!(metrics.accuracy, Some(0.7));

        ledger.reset();
        assert!(ledger.records().is_empty());
        assert!(ledger.patterns().is_empty());
        assert!(ledger.corpus().is_empty());
        assert_eq!(ledger.examples_appended(), 0);
    }
}
