//! # attune-types
//!
//! Shared data model for the Attune adaptation pipeline.
//!
//! Every stage of the pipeline speaks in these types:
//!
//! ```text
//!   ChannelReading ──▶ fusion ──▶ MoodState ─┐
//!                                             ├─▶ Context ──▶ generators ──▶ AdaptationCandidate
//!                               UserProfile ──┘                                     │
//!                                                                                   ▼
//!                     HistoryRecord ◀── ledger ◀── selected candidates ◀── scorer/selector
//! ```
//!
//! ## Invariants
//!
//! - All unit scalars (confidence, energy, valence, arousal, traits,
//!   tendencies) are clamped to `[0, 1]` on every update.
//! - A [`HistoryRecord`]'s outcome transitions at most once.
//! - [`BoundedLog`] never exceeds its capacity and evicts oldest-first.

#![deny(unsafe_code)]

pub mod adaptation;
pub mod bounded;
pub mod context;
pub mod mood;
pub mod profile;
pub mod reading;
pub mod record;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use adaptation::{Adaptation, AdaptationCandidate, AdaptationKind, CandidateSource, ScoreBreakdown};
pub use bounded::BoundedLog;
pub use context::{Context, ContextSnapshot, DeviceClass, FeatureVector, InteractionSummary, FEATURE_COUNT};
pub use mood::{ChannelEstimate, ChannelKind, Mood, MoodState, SecondaryMood};
pub use profile::{Tendencies, TendencyKind, TraitKind, Traits, UserProfile, VisualPreferences};
pub use reading::{ChannelReading, TemperatureTrend};
pub use record::{
    Feedback, HistoryRecord, Outcome, PatternKey, RecordId, SuccessPattern, TrainingExample,
};

/// Clamp a scalar into the unit interval.
///
/// Non-finite input collapses to the neutral midpoint so a single bad value
/// can never push an invariant out of range.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.5
    }
}
