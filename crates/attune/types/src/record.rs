//! Decision records, feedback and learning statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptation::{Adaptation, AdaptationKind};
use crate::context::{ContextSnapshot, FeatureVector};

// ── Identifiers ─────────────────────────────────────────────────────────

/// Unique identifier for a recorded decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

// ── Feedback ────────────────────────────────────────────────────────────

/// User feedback on a decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub positive: bool,
    /// Optional rating in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Feedback {
    pub fn positive() -> Self {
        Self {
            positive: true,
            rating: None,
        }
    }

    pub fn negative() -> Self {
        Self {
            positive: false,
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(crate::clamp_unit(rating));
        self
    }
}

/// Feedback once attached to a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub feedback: Feedback,
    pub received_at: DateTime<Utc>,
}

/// One decision and, eventually, how it went.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub recorded_at: DateTime<Utc>,
    pub snapshot: ContextSnapshot,
    pub features: FeatureVector,
    pub selected: Vec<Adaptation>,
    pub outcome: Option<Outcome>,
}

impl HistoryRecord {
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// True only when resolved with positive feedback.
    pub fn was_positive(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| o.feedback.positive)
    }
}

// ── Learning Statistics ─────────────────────────────────────────────────

/// Key for per-adaptation success statistics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternKey {
    pub kind: AdaptationKind,
    pub action: String,
}

impl PatternKey {
    pub fn of(adaptation: &Adaptation) -> Self {
        Self {
            kind: adaptation.kind,
            action: adaptation.action.clone(),
        }
    }
}

impl std::fmt::Display for PatternKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.kind, self.action)
    }
}

/// Monotonic attempt/success counters for one adaptation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessPattern {
    pub attempts: u64,
    pub successes: u64,
}

impl SuccessPattern {
    /// Success ratio, 0.5 before any attempt.
    pub fn rate(&self) -> f64 {
        if self.attempts == 0 {
            0.5
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    pub fn record(&mut self, positive: bool) {
        self.attempts += 1;
        if positive {
            self.successes += 1;
        }
    }
}

/// One labelled example for the predictive model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: FeatureVector,
    pub chosen: Vec<Adaptation>,
    pub success: bool,
    /// Defaults to 0.5 when no rating was given.
    pub rating: f64,
}
