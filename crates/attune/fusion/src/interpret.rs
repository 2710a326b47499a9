//! Per-channel interpretation: one reading in, one mood estimate out.

use attune_types::{clamp_unit, ChannelEstimate, ChannelKind, ChannelReading, Mood, TemperatureTrend};
use tracing::warn;

use crate::config::{FusionConfig, InteractionThresholds, PulseThresholds, TemperatureThresholds};

/// Interpret a single reading.
///
/// Returns `None` when the reading carries non-finite values or its
/// effective confidence is zero; such channels do not take part in fusion.
pub fn interpret(reading: &ChannelReading, config: &FusionConfig) -> Option<ChannelEstimate> {
    if !reading.is_finite() {
        warn!(channel = %reading.channel(), "Dropping reading with non-finite values");
        return None;
    }

    let reliability = match reading.channel() {
        ChannelKind::Pulse => config.reliability.pulse,
        ChannelKind::Temperature => config.reliability.temperature,
        ChannelKind::Interaction => config.reliability.interaction,
        ChannelKind::Facial => config.reliability.facial,
    };
    let confidence = clamp_unit(reading.confidence() * reliability);
    if confidence <= 0.0 {
        return None;
    }

    let mut estimate = match reading {
        ChannelReading::Pulse { bpm, variability, .. } => pulse(*bpm, *variability, &config.pulse),
        ChannelReading::Temperature { celsius, trend, .. } => {
            temperature(*celsius, *trend, &config.temperature)
        }
        ChannelReading::Interaction {
            click_frequency,
            typing_speed,
            mouse_smoothness,
            mouse_jitter,
            ..
        } => interaction(
            *click_frequency,
            *typing_speed,
            *mouse_smoothness,
            *mouse_jitter,
            &config.interaction,
        ),
        ChannelReading::Facial { emotion, .. } => facial(emotion),
    };
    estimate.confidence = confidence;
    Some(estimate)
}

fn estimate(
    channel: ChannelKind,
    mood: Mood,
    energy: Option<f64>,
    valence: Option<f64>,
    arousal: Option<f64>,
) -> ChannelEstimate {
    ChannelEstimate {
        channel,
        mood,
        confidence: 0.0,
        energy,
        valence,
        arousal,
    }
}

fn pulse(bpm: f64, variability: f64, t: &PulseThresholds) -> ChannelEstimate {
    let (mood, energy, arousal) = if bpm < t.resting_max_bpm {
        (Mood::Relaxed, 0.3, 0.2)
    } else if bpm < t.elevated_max_bpm {
        (Mood::Focused, 0.6, 0.4)
    } else if variability > t.stress_variability {
        (Mood::Stressed, 0.8, 0.9)
    } else {
        (Mood::Excited, 0.8, 0.8)
    };
    estimate(ChannelKind::Pulse, mood, Some(energy), None, Some(arousal))
}

fn temperature(celsius: f64, trend: TemperatureTrend, t: &TemperatureThresholds) -> ChannelEstimate {
    let (mut mood, mut valence) = if celsius < t.normal_min {
        (Mood::Sad, 0.2)
    } else if celsius > t.elevated_min {
        (Mood::Stressed, 0.3)
    } else {
        (Mood::Neutral, 0.6)
    };

    match trend {
        TemperatureTrend::Rising if celsius > t.elevated_min => {
            mood = Mood::Stressed;
            valence = 0.2;
        }
        TemperatureTrend::Falling if mood == Mood::Stressed => {
            mood = Mood::Relaxed;
            valence = 0.7;
        }
        _ => {}
    }
    estimate(ChannelKind::Temperature, mood, None, Some(valence), None)
}

fn interaction(
    clicks: f64,
    typing: f64,
    smoothness: f64,
    jitter: f64,
    t: &InteractionThresholds,
) -> ChannelEstimate {
    let mut mood = Mood::Neutral;
    let mut energy = 0.5;
    let mut arousal = 0.5;

    if clicks > t.high_clicks_per_minute {
        if jitter > t.stress_jitter {
            mood = Mood::Stressed;
            arousal = 0.9;
        } else {
            mood = Mood::Excited;
            arousal = 0.8;
        }
        energy = 0.8;
    } else if clicks < t.low_clicks_per_minute {
        mood = Mood::Bored;
        energy = 0.1;
        arousal = 0.1;
    }

    if typing > t.fast_typing {
        if mood != Mood::Stressed {
            mood = Mood::Focused;
        }
        energy = 0.7;
    } else if typing < t.slow_typing {
        if mood != Mood::Bored {
            mood = Mood::Relaxed;
        }
        energy = 0.3;
    }

    // Jerky, precise movement reads as concentrated work.
    if smoothness < t.rough_mouse_smoothness && mood != Mood::Stressed {
        mood = Mood::Focused;
    }

    estimate(ChannelKind::Interaction, mood, Some(energy), None, Some(arousal))
}

fn facial(emotion: &str) -> ChannelEstimate {
    let (mood, valence, energy, arousal) = match emotion.trim().to_ascii_lowercase().as_str() {
        "happy" => (Mood::Happy, 0.9, 0.7, 0.6),
        "sad" => (Mood::Sad, 0.1, 0.2, 0.3),
        "focused" => (Mood::Focused, 0.6, 0.6, 0.4),
        "stressed" => (Mood::Stressed, 0.2, 0.9, 0.9),
        _ => (Mood::Neutral, 0.5, 0.5, 0.5),
    };
    estimate(ChannelKind::Facial, mood, Some(energy), Some(valence), Some(arousal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> FusionConfig {
        FusionConfig::default()
    }

    fn pulse_reading(bpm: f64, variability: f64) -> ChannelReading {
        ChannelReading::Pulse {
            bpm,
            variability,
            confidence: 1.0,
        }
    }

    fn interaction_reading(clicks: f64, typing: f64, smooth: f64, jitter: f64) -> ChannelReading {
        ChannelReading::Interaction {
            click_frequency: clicks,
            typing_speed: typing,
            mouse_smoothness: smooth,
            mouse_jitter: jitter,
            scroll_velocity: 0.0,
            confidence: 1.0,
        }
    }

    #[test]
    fn pulse_bands() {
        let e = interpret(&pulse_reading(70.0, 5.0), &cfg()).unwrap();
        assert_eq!(e.mood, Mood::Relaxed);
        assert_eq!(e.energy, Some(0.3));
        assert_eq!(e.valence, None);
        assert!((e.confidence - 0.8).abs() < f64::EPSILON);

        assert_eq!(interpret(&pulse_reading(90.0, 5.0), &cfg()).unwrap().mood, Mood::Focused);

        let stressed = interpret(&pulse_reading(120.0, 20.0), &cfg()).unwrap();
        assert_eq!(stressed.mood, Mood::Stressed);
        assert_eq!(stressed.arousal, Some(0.9));

        let excited = interpret(&pulse_reading(120.0, 10.0), &cfg()).unwrap();
        assert_eq!(excited.mood, Mood::Excited);
        assert_eq!(excited.energy, Some(0.8));
    }

    #[test]
    fn temperature_trends() {
        let reading = |celsius, trend| ChannelReading::Temperature {
            celsius,
            trend,
            confidence: 1.0,
        };
        let cold = interpret(&reading(35.5, TemperatureTrend::Stable), &cfg()).unwrap();
        assert_eq!((cold.mood, cold.valence), (Mood::Sad, Some(0.2)));

        let normal = interpret(&reading(36.5, TemperatureTrend::Stable), &cfg()).unwrap();
        assert_eq!((normal.mood, normal.valence), (Mood::Neutral, Some(0.6)));

        let rising = interpret(&reading(37.4, TemperatureTrend::Rising), &cfg()).unwrap();
        assert_eq!((rising.mood, rising.valence), (Mood::Stressed, Some(0.2)));

        let falling = interpret(&reading(37.4, TemperatureTrend::Falling), &cfg()).unwrap();
        assert_eq!((falling.mood, falling.valence), (Mood::Relaxed, Some(0.7)));

        assert!((rising.confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn interaction_patterns() {
        let frantic = interpret(&interaction_reading(12.0, 50.0, 0.8, 0.9), &cfg()).unwrap();
        assert_eq!(frantic.mood, Mood::Stressed);
        assert_eq!(frantic.arousal, Some(0.9));

        // Fast typing keeps stressed but bumps energy.
        let typing = interpret(&interaction_reading(12.0, 100.0, 0.8, 0.9), &cfg()).unwrap();
        assert_eq!(typing.mood, Mood::Stressed);
        assert_eq!(typing.energy, Some(0.7));

        let idle = interpret(&interaction_reading(1.0, 10.0, 0.8, 0.1), &cfg()).unwrap();
        assert_eq!(idle.mood, Mood::Bored);
        assert_eq!(idle.energy, Some(0.3));

        let precise = interpret(&interaction_reading(5.0, 50.0, 0.1, 0.1), &cfg()).unwrap();
        assert_eq!(precise.mood, Mood::Focused);

        let calm = interpret(&interaction_reading(5.0, 20.0, 0.8, 0.1), &cfg()).unwrap();
        assert_eq!(calm.mood, Mood::Relaxed);
    }

    #[test]
    fn facial_table_and_unknown_label() {
        let happy = ChannelReading::Facial {
            emotion: "Happy".into(),
            confidence: 1.0,
        };
        let e = interpret(&happy, &cfg()).unwrap();
        assert_eq!(e.mood, Mood::Happy);
        assert_eq!(e.valence, Some(0.9));

        let odd = ChannelReading::Facial {
            emotion: "surprised".into(),
            confidence: 1.0,
        };
        assert_eq!(interpret(&odd, &cfg()).unwrap().mood, Mood::Neutral);
    }

    #[test]
    fn zero_confidence_and_non_finite_dropped() {
        let silent = ChannelReading::Pulse {
            bpm: 70.0,
            variability: 2.0,
            confidence: 0.0,
        };
        assert!(interpret(&silent, &cfg()).is_none());
        assert!(interpret(&pulse_reading(f64::INFINITY, 1.0), &cfg()).is_none());
    }
}
