//! Confidence-weighted mood aggregation shared by fusion and windowing.

use attune_types::{clamp_unit, Mood, SecondaryMood};

/// Running `mood → weight` map plus weighted scalar sums.
///
/// Mood order is first-seen, so ties resolve to the earliest contributor.
#[derive(Debug, Default)]
pub(crate) struct MoodAccumulator {
    weights: Vec<(Mood, f64)>,
    total: f64,
    energy: f64,
    valence: f64,
    arousal: f64,
    count: usize,
}

/// Result of folding an accumulator.
#[derive(Debug)]
pub(crate) struct Aggregate {
    pub primary: Mood,
    pub primary_weight: f64,
    pub secondaries: Vec<SecondaryMood>,
    pub count: usize,
    pub energy: f64,
    pub valence: f64,
    pub arousal: f64,
}

impl MoodAccumulator {
    pub fn add(&mut self, mood: Mood, weight: f64, energy: f64, valence: f64, arousal: f64) {
        match self.weights.iter_mut().find(|(m, _)| *m == mood) {
            Some((_, w)) => *w += weight,
            None => self.weights.push((mood, weight)),
        }
        self.total += weight;
        self.energy += energy * weight;
        self.valence += valence * weight;
        self.arousal += arousal * weight;
        self.count += 1;
    }

    /// `None` when nothing with positive weight was added.
    pub fn finish(mut self) -> Option<Aggregate> {
        if self.count == 0 || self.total <= 0.0 {
            return None;
        }
        // Stable sort keeps first-seen order among equal weights.
        self.weights
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let (primary, primary_weight) = self.weights[0];
        let secondaries = self
            .weights
            .iter()
            .skip(1)
            .take(2)
            .map(|(mood, w)| SecondaryMood {
                mood: *mood,
                confidence: clamp_unit(w / self.total),
            })
            .collect();

        Some(Aggregate {
            primary,
            primary_weight,
            secondaries,
            count: self.count,
            energy: clamp_unit(self.energy / self.total),
            valence: clamp_unit(self.valence / self.total),
            arousal: clamp_unit(self.arousal / self.total),
        })
    }
}
