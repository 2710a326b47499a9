//! Mood vocabulary and the fused mood state.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clamp_unit;

// ── Mood ────────────────────────────────────────────────────────────────

/// Discrete mood labels recognised by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
    Focused,
    Stressed,
    Relaxed,
    Excited,
    Bored,
}

impl Mood {
    /// All moods, in declaration order.
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Neutral,
        Mood::Focused,
        Mood::Stressed,
        Mood::Relaxed,
        Mood::Excited,
        Mood::Bored,
    ];

    /// Numeric code used as the first component of a feature vector.
    pub fn feature_code(&self) -> f64 {
        match self {
            Self::Happy => 0.8,
            Self::Sad => 0.2,
            Self::Neutral => 0.5,
            Self::Focused => 0.6,
            Self::Stressed => 0.3,
            Self::Relaxed => 0.7,
            Self::Excited => 0.9,
            Self::Bored => 0.1,
        }
    }

    /// Short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
            Self::Focused => "focused",
            Self::Stressed => "stressed",
            Self::Relaxed => "relaxed",
            Self::Excited => "excited",
            Self::Bored => "bored",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Mood::ALL
            .iter()
            .copied()
            .find(|m| m.label() == needle)
            .ok_or_else(|| format!("unknown mood '{}'", s))
    }
}

// ── Channel Estimates ───────────────────────────────────────────────────

/// The independent signal sources that feed fusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Pulse,
    Temperature,
    Interaction,
    Facial,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pulse => write!(f, "pulse"),
            Self::Temperature => write!(f, "temperature"),
            Self::Interaction => write!(f, "interaction"),
            Self::Facial => write!(f, "facial"),
        }
    }
}

/// One channel's interpretation of its reading.
///
/// Scalars a channel cannot estimate are left as `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelEstimate {
    /// Which channel produced this estimate.
    pub channel: ChannelKind,
    /// Mood the channel votes for.
    pub mood: Mood,
    /// Effective confidence after the channel's reliability factor.
    pub confidence: f64,
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub arousal: Option<f64>,
}

// ── Mood State ──────────────────────────────────────────────────────────

/// A runner-up mood with its normalized weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SecondaryMood {
    pub mood: Mood,
    pub confidence: f64,
}

/// The fused, probabilistic mood state.
///
/// Immutable once produced; retained in a bounded rolling history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodState {
    /// Dominant mood.
    pub primary_mood: Mood,
    /// Confidence in the dominant mood (0.0 to 1.0).
    pub confidence: f64,
    /// Energy level (0.0 = drained, 1.0 = energetic).
    pub energy: f64,
    /// Valence (0.0 = negative, 1.0 = positive).
    pub valence: f64,
    /// Arousal (0.0 = calm, 1.0 = excited).
    pub arousal: f64,
    /// Up to two runner-up moods, strongest first.
    pub secondary_moods: Vec<SecondaryMood>,
    /// When this state was produced.
    pub observed_at: DateTime<Utc>,
    /// Per-channel estimates that contributed to this state.
    #[serde(default)]
    pub indicators: Vec<ChannelEstimate>,
}

impl MoodState {
    /// The neutral fallback: all scalars at the midpoint, zero confidence.
    pub fn neutral(observed_at: DateTime<Utc>) -> Self {
        Self {
            primary_mood: Mood::Neutral,
            confidence: 0.0,
            energy: 0.5,
            valence: 0.5,
            arousal: 0.5,
            secondary_moods: Vec::new(),
            observed_at,
            indicators: Vec::new(),
        }
    }

    /// Build a state from explicit scalars (clamped), observed now.
    pub fn with_scalars(mood: Mood, confidence: f64, energy: f64, valence: f64, arousal: f64) -> Self {
        Self {
            primary_mood: mood,
            confidence: clamp_unit(confidence),
            energy: clamp_unit(energy),
            valence: clamp_unit(valence),
            arousal: clamp_unit(arousal),
            secondary_moods: Vec::new(),
            observed_at: Utc::now(),
            indicators: Vec::new(),
        }
    }

    /// Whether this is the zero-confidence neutral fallback.
    pub fn is_neutral_default(&self) -> bool {
        self.primary_mood == Mood::Neutral && self.confidence == 0.0
    }
}
