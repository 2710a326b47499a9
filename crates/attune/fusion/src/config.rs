//! Fusion thresholds and channel reliabilities.

use serde::{Deserialize, Serialize};

/// Multiplier applied to each channel's self-reported confidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelReliability {
    pub pulse: f64,
    pub temperature: f64,
    pub interaction: f64,
    pub facial: f64,
}

impl Default for ChannelReliability {
    fn default() -> Self {
        Self {
            pulse: 0.8,
            temperature: 0.6,
            interaction: 0.7,
            facial: 0.9,
        }
    }
}

/// Heart-rate bands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseThresholds {
    /// Below this BPM the channel reads relaxed.
    pub resting_max_bpm: f64,
    /// Below this BPM (and above resting) the channel reads focused.
    pub elevated_max_bpm: f64,
    /// Above this variability a high pulse reads stressed rather than excited.
    pub stress_variability: f64,
}

impl Default for PulseThresholds {
    fn default() -> Self {
        Self {
            resting_max_bpm: 80.0,
            elevated_max_bpm: 100.0,
            stress_variability: 15.0,
        }
    }
}

/// Skin-temperature bands in degrees Celsius.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureThresholds {
    pub normal_min: f64,
    pub elevated_min: f64,
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            normal_min: 36.0,
            elevated_min: 37.0,
        }
    }
}

/// Interaction-pattern thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionThresholds {
    pub high_clicks_per_minute: f64,
    pub low_clicks_per_minute: f64,
    pub stress_jitter: f64,
    pub fast_typing: f64,
    pub slow_typing: f64,
    pub rough_mouse_smoothness: f64,
}

impl Default for InteractionThresholds {
    fn default() -> Self {
        Self {
            high_clicks_per_minute: 8.0,
            low_clicks_per_minute: 2.0,
            stress_jitter: 0.7,
            fast_typing: 80.0,
            slow_typing: 30.0,
            rough_mouse_smoothness: 0.3,
        }
    }
}

/// Configuration for [`SignalFusion`](crate::SignalFusion).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Maximum number of fused states retained.
    pub history_capacity: usize,
    /// Default look-back for `current_mood`, in seconds.
    pub current_window_secs: i64,
    /// Default look-back for `mood_trends`, in seconds.
    pub trend_window_secs: i64,
    pub reliability: ChannelReliability,
    pub pulse: PulseThresholds,
    pub temperature: TemperatureThresholds,
    pub interaction: InteractionThresholds,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            history_capacity: 200,
            current_window_secs: 30,
            trend_window_secs: 600,
            reliability: ChannelReliability::default(),
            pulse: PulseThresholds::default(),
            temperature: TemperatureThresholds::default(),
            interaction: InteractionThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = FusionConfig::default();
        assert_eq!(cfg.history_capacity, 200);
        assert_eq!(cfg.current_window_secs, 30);
        assert!((cfg.reliability.pulse - 0.8).abs() < f64::EPSILON);
        assert!((cfg.reliability.temperature - 0.6).abs() < f64::EPSILON);
        assert!((cfg.reliability.interaction - 0.7).abs() < f64::EPSILON);
        assert!((cfg.reliability.facial - 0.9).abs() < f64::EPSILON);
        assert_eq!(cfg.interaction.high_clicks_per_minute, 8.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg: FusionConfig =
            serde_json::from_str(r#"{"history_capacity": 50, "pulse": {"resting_max_bpm": 70}}"#).unwrap();
        assert_eq!(cfg.history_capacity, 50);
        assert_eq!(cfg.pulse.resting_max_bpm, 70.0);
        assert_eq!(cfg.pulse.elevated_max_bpm, 100.0);
        assert_eq!(cfg.temperature, TemperatureThresholds::default());
    }
}
