//! # attune-engine
//!
//! Orchestrates the Attune pipeline: physiological and behavioural channel
//! readings are fused into a [`MoodState`](attune_types::MoodState), a
//! decision cycle turns a [`Context`](attune_types::Context) into a
//! non-empty, conflict-free set of adaptations, and user feedback closes
//! the loop through the ledger.
//!
//! ```text
//!   ChannelReading[] ──▶ SignalFusion ──▶ MoodState (history, trends)
//!
//!   Context ──▶ ┌──────────────┐   rule / predictive / contextual / historical
//!               │  generators  │──▶ candidates
//!               └──────────────┘          │
//!                                  CandidateScorer (mood, user, context, success)
//!                                         │
//!                                  ConflictSelector (budget, antagonists)
//!                                         │
//!                                  FeedbackLedger.record ──▶ Decision
//!
//!   Feedback ──▶ FeedbackLedger.apply_feedback ──▶ patterns, corpus, retrain
//! ```
//!
//! [`AttuneEngine`] is single-owner; [`SharedAttune`] wraps it for
//! concurrent async callers.

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod shared;
pub mod telemetry;

pub use config::{AttuneConfig, LoggingConfig};
pub use engine::{AttuneEngine, Decision};
pub use error::{AttuneError, AttuneResult};
pub use shared::SharedAttune;
pub use telemetry::{init_from_config, init_tracing};

pub use attune_adaptation as adaptation;
pub use attune_fusion as fusion;
pub use attune_learning as learning;
pub use attune_types as types;
