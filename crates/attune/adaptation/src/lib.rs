//! # attune-adaptation
//!
//! Turns a decision [`Context`](attune_types::Context) into a conflict-free
//! set of adaptation candidates.
//!
//! ```text
//!                ┌─────────────────────┐
//!   Context ───▶ │ RuleGenerator       │──┐
//!   features     │ PredictiveGenerator │  │
//!   history      │ ContextualGenerator │  ├─▶ CandidateScorer ──▶ ConflictSelector ──▶ selected
//!   model        │ HistoricalGenerator │──┘     (rank, stable)     (budget 0.8)
//!                └─────────────────────┘
//! ```
//!
//! ## Pieces
//!
//! - [`rules`]: declarative rule table compiled into typed predicates.
//! - [`model`]: the pluggable [`PredictiveModel`] and its three variants.
//! - [`generators`]: the [`CandidateGenerator`] trait and its four
//!   implementations.
//! - [`scorer`]: four-factor weighted scoring with stable ranking.
//! - [`selector`]: greedy selection that never accepts antagonistic
//!   adaptations on the same surface.

#![deny(unsafe_code)]

pub mod error;
pub mod generators;
pub mod model;
pub mod rules;
pub mod scorer;
pub mod selector;

pub use error::{AdaptationError, AdaptationResult};
pub use generators::{
    match_rules, CandidateGenerator, ContextualGenerator, GenerationConfig, GenerationInput,
    HistoricalGenerator, KeywordBundle, NightWindow, PredictiveGenerator, RuleGenerator,
};
pub use model::{
    DisabledModel, HeuristicModel, LookupEntry, LookupTableModel, ModelKind, ModelMetrics,
    PredictiveModel,
};
pub use rules::{Comparator, Predicate, Rule, RuleSpec, RuleTable, ScalarField};
pub use scorer::{CandidateScorer, NoHistory, ScoringWeights, SuccessRates};
pub use selector::{default_candidate, AntagonistPair, ConflictSelector, SelectionConfig};
