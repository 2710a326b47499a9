//! The fusion stage and its rolling history.

use attune_types::{clamp_unit, BoundedLog, ChannelReading, MoodState};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::accumulate::MoodAccumulator;
use crate::config::FusionConfig;
use crate::interpret::interpret;
use crate::trends::MoodTrends;

/// Turns batches of channel readings into fused [`MoodState`]s.
///
/// Each produced state is appended to a bounded history (oldest evicted
/// first) that backs [`current_mood`](Self::current_mood) and
/// [`mood_trends`](Self::mood_trends).
pub struct SignalFusion {
    config: FusionConfig,
    history: BoundedLog<MoodState>,
}

impl SignalFusion {
    pub fn new(config: FusionConfig) -> Self {
        let history = BoundedLog::new(config.history_capacity);
        Self { config, history }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse readings observed now.
    pub fn fuse(&mut self, readings: &[ChannelReading]) -> MoodState {
        self.fuse_at(readings, Utc::now())
    }

    /// Fuse readings with an explicit observation time.
    pub fn fuse_at(&mut self, readings: &[ChannelReading], at: DateTime<Utc>) -> MoodState {
        let estimates: Vec<_> = readings
            .iter()
            .filter_map(|r| interpret(r, &self.config))
            .collect();

        let mut acc = MoodAccumulator::default();
        for e in &estimates {
            acc.add(
                e.mood,
                e.confidence,
                e.energy.unwrap_or(0.5),
                e.valence.unwrap_or(0.5),
                e.arousal.unwrap_or(0.5),
            );
        }

        let state = match acc.finish() {
            Some(agg) => MoodState {
                primary_mood: agg.primary,
                confidence: clamp_unit(agg.primary_weight / agg.count as f64),
                energy: agg.energy,
                valence: agg.valence,
                arousal: agg.arousal,
                secondary_moods: agg.secondaries,
                observed_at: at,
                indicators: estimates,
            },
            None => MoodState::neutral(at),
        };

        debug!(
            channels = readings.len(),
            mood = %state.primary_mood,
            confidence = state.confidence,
            "Fused mood state"
        );
        self.history.push(state.clone());
        state
    }

    /// Aggregate of the history within the configured default window.
    pub fn current_mood(&self) -> MoodState {
        self.current_mood_at(Duration::seconds(self.config.current_window_secs), Utc::now())
    }

    /// Aggregate of history entries observed less than `window` before `now`.
    ///
    /// Empty history yields the neutral default; an empty window yields the
    /// most recent entry. Entries are weighted by confidence, or equally when
    /// every windowed entry has zero confidence.
    pub fn current_mood_at(&self, window: Duration, now: DateTime<Utc>) -> MoodState {
        let Some(latest) = self.history.latest() else {
            return MoodState::neutral(now);
        };

        let recent: Vec<&MoodState> = self
            .history
            .iter()
            .filter(|s| now - s.observed_at < window)
            .collect();
        if recent.is_empty() {
            return latest.clone();
        }

        let all_zero = recent.iter().all(|s| s.confidence <= 0.0);
        let mut acc = MoodAccumulator::default();
        for s in &recent {
            let weight = if all_zero { 1.0 } else { s.confidence };
            acc.add(s.primary_mood, weight, s.energy, s.valence, s.arousal);
        }
        let mean_confidence =
            recent.iter().map(|s| s.confidence).sum::<f64>() / recent.len() as f64;

        match acc.finish() {
            Some(agg) => MoodState {
                primary_mood: agg.primary,
                confidence: clamp_unit(mean_confidence),
                energy: agg.energy,
                valence: agg.valence,
                arousal: agg.arousal,
                secondary_moods: agg.secondaries,
                observed_at: now,
                indicators: Vec::new(),
            },
            None => latest.clone(),
        }
    }

    /// Trends over the configured default trend window.
    pub fn mood_trends(&self) -> Option<MoodTrends> {
        self.mood_trends_at(Duration::seconds(self.config.trend_window_secs), Utc::now())
    }

    /// Trends over entries observed at or after `now - window`.
    pub fn mood_trends_at(&self, window: Duration, now: DateTime<Utc>) -> Option<MoodTrends> {
        let cutoff = now - window;
        MoodTrends::from_states(self.history.iter().filter(|s| s.observed_at >= cutoff))
    }

    pub fn history(&self) -> &BoundedLog<MoodState> {
        &self.history
    }

    /// Forget every fused state.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for SignalFusion {
    fn default() -> Self {
        Self::new(FusionConfig::default())
    }
}
