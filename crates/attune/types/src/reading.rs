//! Raw per-channel readings handed to fusion by the sensor layer.

use serde::{Deserialize, Serialize};

use crate::mood::ChannelKind;

/// Direction of the skin-temperature signal over the last few samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureTrend {
    Rising,
    Falling,
    #[default]
    Stable,
}

/// One noisy observation from a single channel.
///
/// `confidence` is the sensor's own confidence in `[0, 1]`; fusion scales it
/// by a per-channel reliability factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
pub enum ChannelReading {
    Pulse {
        bpm: f64,
        variability: f64,
        confidence: f64,
    },
    Temperature {
        celsius: f64,
        #[serde(default)]
        trend: TemperatureTrend,
        confidence: f64,
    },
    Interaction {
        /// Clicks per minute.
        click_frequency: f64,
        /// Characters per minute.
        typing_speed: f64,
        mouse_smoothness: f64,
        mouse_jitter: f64,
        scroll_velocity: f64,
        confidence: f64,
    },
    Facial {
        emotion: String,
        confidence: f64,
    },
}

impl ChannelReading {
    /// The channel this reading came from.
    pub fn channel(&self) -> ChannelKind {
        match self {
            Self::Pulse { .. } => ChannelKind::Pulse,
            Self::Temperature { .. } => ChannelKind::Temperature,
            Self::Interaction { .. } => ChannelKind::Interaction,
            Self::Facial { .. } => ChannelKind::Facial,
        }
    }

    /// The sensor-reported confidence.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Pulse { confidence, .. }
            | Self::Temperature { confidence, .. }
            | Self::Interaction { confidence, .. }
            | Self::Facial { confidence, .. } => *confidence,
        }
    }

    /// Whether every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Pulse {
                bpm,
                variability,
                confidence,
            } => bpm.is_finite() && variability.is_finite() && confidence.is_finite(),
            Self::Temperature {
                celsius, confidence, ..
            } => celsius.is_finite() && confidence.is_finite(),
            Self::Interaction {
                click_frequency,
                typing_speed,
                mouse_smoothness,
                mouse_jitter,
                scroll_velocity,
                confidence,
            } => [
                *click_frequency,
                *typing_speed,
                *mouse_smoothness,
                *mouse_jitter,
                *scroll_velocity,
                *confidence,
            ]
            .iter()
            .all(|v| v.is_finite()),
            Self::Facial { confidence, .. } => confidence.is_finite(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_and_confidence_accessors() {
        let r = ChannelReading::Facial {
            emotion: "happy".into(),
            confidence: 0.7,
        };
        assert_eq!(r.channel(), ChannelKind::Facial);
        assert!((r.confidence() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_detected() {
        let r = ChannelReading::Pulse {
            bpm: f64::NAN,
            variability: 3.0,
            confidence: 0.9,
        };
        assert!(!r.is_finite());
    }

    #[test]
    fn tagged_json_shape() {
        let json = r#"{"channel":"temperature","celsius":37.2,"confidence":0.8}"#;
        let r: ChannelReading = serde_json::from_str(json).unwrap();
        match r {
            ChannelReading::Temperature { trend, .. } => assert_eq!(trend, TemperatureTrend::Stable),
            other => panic!("unexpected reading {:?}", other),
        }
    }
}
