//! # attune-learning
//!
//! Online learning loop for Attune. The [`FeedbackLedger`] records each
//! decision, resolves it with user feedback at most once, maintains
//! per-adaptation [`SuccessPattern`](attune_types::SuccessPattern)s and a
//! bounded training corpus, and periodically retrains the predictive model.
//!
//! ```text
//!   decide ──▶ record() ──▶ HistoryRecord (outcome: None)     [500, FIFO]
//!                                   │
//!   feedback ──▶ apply_feedback() ──┼─▶ outcome set once
//!                                   ├─▶ SuccessPattern += attempt (+ success)
//!                                   └─▶ TrainingExample ──▶ corpus [1000, FIFO]
//!                                                              │ every 50 appended
//!                                                              ▼
//!                                                       model.train(corpus)
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod ledger;

pub use config::LearningConfig;
pub use ledger::{FeedbackLedger, FeedbackReceipt};
