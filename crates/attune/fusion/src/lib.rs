//! # attune-fusion
//!
//! Combines several unreliable per-channel readings into one probabilistic
//! [`MoodState`](attune_types::MoodState).
//!
//! ```text
//!   Pulse ────────┐
//!   Temperature ──┤  interpret()   ┌─────────────────┐
//!   Interaction ──┼──────────────▶ │ MoodAccumulator │ ──▶ MoodState ──▶ history (200)
//!   Facial ───────┘  × reliability └─────────────────┘                     │
//!                                                                          ├─▶ current_mood(window)
//!                                                                          └─▶ mood_trends(window)
//! ```
//!
//! Channels are interpreted independently, scaled by a fixed reliability
//! factor, and folded by confidence weight. Channels with zero confidence or
//! non-finite values are dropped; with nothing left the neutral default is
//! produced.

#![deny(unsafe_code)]

mod accumulate;
pub mod config;
pub mod fusion;
pub mod interpret;
pub mod trends;

pub use config::{
    ChannelReliability, FusionConfig, InteractionThresholds, PulseThresholds, TemperatureThresholds,
};
pub use fusion::SignalFusion;
pub use interpret::interpret;
pub use trends::{MoodTrends, TrendPoint};
