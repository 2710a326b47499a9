//! Mood trend summaries over a window of fused states.

use attune_types::{Mood, MoodState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fused state reduced to its trend-relevant fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub at: DateTime<Utc>,
    pub mood: Mood,
    pub energy: f64,
    pub valence: f64,
    pub arousal: f64,
}

/// How the user's state moved over a window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodTrends {
    pub timeline: Vec<TrendPoint>,
    pub average_energy: f64,
    pub average_valence: f64,
    pub average_arousal: f64,
    /// Number of adjacent timeline points whose primary mood differs.
    pub mood_changes: usize,
}

impl MoodTrends {
    /// Summarize states, oldest first. `None` for fewer than two.
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a MoodState>) -> Option<Self> {
        let timeline: Vec<TrendPoint> = states
            .into_iter()
            .map(|s| TrendPoint {
                at: s.observed_at,
                mood: s.primary_mood,
                energy: s.energy,
                valence: s.valence,
                arousal: s.arousal,
            })
            .collect();
        if timeline.len() < 2 {
            return None;
        }

        let n = timeline.len() as f64;
        let mean = |f: fn(&TrendPoint) -> f64| timeline.iter().map(f).sum::<f64>() / n;
        let average_energy = mean(|p| p.energy);
        let average_valence = mean(|p| p.valence);
        let average_arousal = mean(|p| p.arousal);
        let mood_changes = timeline.windows(2).filter(|w| w[0].mood != w[1].mood).count();

        Some(Self {
            timeline,
            average_energy,
            average_valence,
            average_arousal,
            mood_changes,
        })
    }
}
