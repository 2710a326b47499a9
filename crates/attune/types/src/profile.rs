//! User profile snapshot: personality traits, behavioural tendencies and
//! visual preferences.

use serde::{Deserialize, Serialize};

use crate::clamp_unit;

/// Smoothing factor applied to the previous value on each observation.
const RETAIN: f64 = 0.9;
/// Weight of the new observation.
const OBSERVE: f64 = 0.1;

/// Exponentially smooth `old` towards `observation`, clamped.
fn smooth(old: f64, observation: f64) -> f64 {
    clamp_unit(RETAIN * old + OBSERVE * clamp_unit(observation))
}

// ── Traits ──────────────────────────────────────────────────────────────

/// Personality trait identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    Neuroticism,
    Extraversion,
    Openness,
    Agreeableness,
    Conscientiousness,
}

/// Big-five style personality traits, each in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traits {
    pub neuroticism: f64,
    pub extraversion: f64,
    pub openness: f64,
    pub agreeableness: f64,
    pub conscientiousness: f64,
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            neuroticism: 0.5,
            extraversion: 0.5,
            openness: 0.5,
            agreeableness: 0.5,
            conscientiousness: 0.5,
        }
    }
}

impl Traits {
    fn slot(&mut self, kind: TraitKind) -> &mut f64 {
        match kind {
            TraitKind::Neuroticism => &mut self.neuroticism,
            TraitKind::Extraversion => &mut self.extraversion,
            TraitKind::Openness => &mut self.openness,
            TraitKind::Agreeableness => &mut self.agreeableness,
            TraitKind::Conscientiousness => &mut self.conscientiousness,
        }
    }

    pub fn get(&self, kind: TraitKind) -> f64 {
        match kind {
            TraitKind::Neuroticism => self.neuroticism,
            TraitKind::Extraversion => self.extraversion,
            TraitKind::Openness => self.openness,
            TraitKind::Agreeableness => self.agreeableness,
            TraitKind::Conscientiousness => self.conscientiousness,
        }
    }
}

// ── Tendencies ──────────────────────────────────────────────────────────

/// Behavioural tendency identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TendencyKind {
    RiskTaking,
    Impatience,
    Curiosity,
    Perfectionism,
    SocialEngagement,
}

/// Behavioural tendencies, each in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tendencies {
    pub risk_taking: f64,
    pub impatience: f64,
    pub curiosity: f64,
    pub perfectionism: f64,
    pub social_engagement: f64,
}

impl Default for Tendencies {
    fn default() -> Self {
        Self {
            risk_taking: 0.5,
            impatience: 0.5,
            curiosity: 0.5,
            perfectionism: 0.5,
            social_engagement: 0.5,
        }
    }
}

impl Tendencies {
    fn slot(&mut self, kind: TendencyKind) -> &mut f64 {
        match kind {
            TendencyKind::RiskTaking => &mut self.risk_taking,
            TendencyKind::Impatience => &mut self.impatience,
            TendencyKind::Curiosity => &mut self.curiosity,
            TendencyKind::Perfectionism => &mut self.perfectionism,
            TendencyKind::SocialEngagement => &mut self.social_engagement,
        }
    }

    pub fn get(&self, kind: TendencyKind) -> f64 {
        match kind {
            TendencyKind::RiskTaking => self.risk_taking,
            TendencyKind::Impatience => self.impatience,
            TendencyKind::Curiosity => self.curiosity,
            TendencyKind::Perfectionism => self.perfectionism,
            TendencyKind::SocialEngagement => self.social_engagement,
        }
    }
}

// ── Profile ─────────────────────────────────────────────────────────────

/// Visual presentation preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualPreferences {
    pub prefers_bright: bool,
    pub prefers_contrast: bool,
}

/// Snapshot of what is known about the user.
///
/// Maintained by an external profiler; the pipeline only reads it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub traits: Traits,
    pub tendencies: Tendencies,
    pub visual: VisualPreferences,
}

impl UserProfile {
    /// Fold a new trait observation in with `0.9·old + 0.1·obs`.
    pub fn observe_trait(&mut self, kind: TraitKind, observation: f64) {
        let slot = self.traits.slot(kind);
        *slot = smooth(*slot, observation);
    }

    /// Fold a new tendency observation in with `0.9·old + 0.1·obs`.
    pub fn observe_tendency(&mut self, kind: TendencyKind, observation: f64) {
        let slot = self.tendencies.slot(kind);
        *slot = smooth(*slot, observation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_midpoint() {
        let p = UserProfile::default();
        assert_eq!(p.traits.openness, 0.5);
        assert_eq!(p.tendencies.curiosity, 0.5);
        assert!(!p.visual.prefers_bright);
    }

    #[test]
    fn observe_trait_smooths() {
        let mut p = UserProfile::default();
        p.observe_trait(TraitKind::Neuroticism, 1.0);
        assert!((p.traits.neuroticism - 0.55).abs() < 1e-12);
        p.observe_trait(TraitKind::Neuroticism, 1.0);
        assert!((p.traits.neuroticism - 0.595).abs() < 1e-12);
    }

    #[test]
    fn observe_clamps_wild_input() {
        let mut p = UserProfile::default();
        for _ in 0..200 {
            p.observe_tendency(TendencyKind::Impatience, 50.0);
        }
        assert!(p.tendencies.get(TendencyKind::Impatience) <= 1.0);
        for _ in 0..200 {
            p.observe_tendency(TendencyKind::Impatience, -50.0);
        }
        assert!(p.tendencies.get(TendencyKind::Impatience) >= 0.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p: UserProfile = serde_json::from_str(r#"{"traits":{"openness":0.9}}"#).unwrap();
        assert_eq!(p.traits.get(TraitKind::Openness), 0.9);
        assert_eq!(p.traits.get(TraitKind::Extraversion), 0.5);
    }
}
