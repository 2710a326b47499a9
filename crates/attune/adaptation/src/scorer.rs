//! Candidate scorer: ranks candidates by a weighted four-factor score.
//!
//! `overall = w_mood·moodMatch + w_user·userMatch + w_context·contextMatch
//! + w_success·successRate`, each factor clamped to `[0, 1]` first.

use std::collections::HashMap;

use attune_types::{
    clamp_unit, Adaptation, AdaptationCandidate, AdaptationKind, CandidateSource, Context,
    DeviceClass, Mood, PatternKey, ScoreBreakdown, SuccessPattern,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generators::NightWindow;

// ── Weights ─────────────────────────────────────────────────────────────

/// Weights for composing the overall score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub mood_match: f64,
    pub user_match: f64,
    pub context_match: f64,
    pub success_rate: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            mood_match: 0.3,
            user_match: 0.3,
            context_match: 0.2,
            success_rate: 0.2,
        }
    }
}

impl ScoringWeights {
    pub fn as_array(&self) -> [f64; 4] {
        [self.mood_match, self.user_match, self.context_match, self.success_rate]
    }
}

// ── Success Rates ───────────────────────────────────────────────────────

/// Source of historical per-adaptation success rates.
pub trait SuccessRates {
    /// Rate for one adaptation; 0.5 when never attempted.
    fn rate(&self, adaptation: &Adaptation) -> f64;
}

impl SuccessRates for HashMap<PatternKey, SuccessPattern> {
    fn rate(&self, adaptation: &Adaptation) -> f64 {
        self.get(&PatternKey::of(adaptation))
            .map(SuccessPattern::rate)
            .unwrap_or(0.5)
    }
}

/// No history at all: every adaptation gets the prior.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHistory;

impl SuccessRates for NoHistory {
    fn rate(&self, _adaptation: &Adaptation) -> f64 {
        0.5
    }
}

// ── Scorer ──────────────────────────────────────────────────────────────

/// Scores and ranks candidates for a context.
#[derive(Clone, Debug, Default)]
pub struct CandidateScorer {
    pub weights: ScoringWeights,
    night: NightWindow,
}

impl CandidateScorer {
    pub fn new(weights: ScoringWeights, night: NightWindow) -> Self {
        Self { weights, night }
    }

    /// Compute the breakdown and overall score for one candidate.
    pub fn score(
        &self,
        candidate: &AdaptationCandidate,
        context: &Context,
        rates: &dyn SuccessRates,
    ) -> (f64, ScoreBreakdown) {
        let breakdown = ScoreBreakdown {
            mood_match: clamp_unit(mood_match(candidate, context.mood.primary_mood)),
            user_match: clamp_unit(user_match(&candidate.adaptations, context)),
            context_match: clamp_unit(self.context_match(&candidate.adaptations, context)),
            success_rate: clamp_unit(success_rate(&candidate.adaptations, rates)),
        };
        let w = &self.weights;
        let overall = clamp_unit(
            w.mood_match * breakdown.mood_match
                + w.user_match * breakdown.user_match
                + w.context_match * breakdown.context_match
                + w.success_rate * breakdown.success_rate,
        );
        (overall, breakdown)
    }

    /// Score every candidate and sort by score, highest first. Ties keep
    /// emission order.
    pub fn rank(
        &self,
        candidates: Vec<AdaptationCandidate>,
        context: &Context,
        rates: &dyn SuccessRates,
    ) -> Vec<AdaptationCandidate> {
        let mut scored: Vec<AdaptationCandidate> = candidates
            .into_iter()
            .map(|mut c| {
                let (overall, breakdown) = self.score(&c, context, rates);
                c.overall_score = Some(overall);
                c.breakdown = Some(breakdown);
                c
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        debug!(
            candidates = scored.len(),
            top = scored.first().map(|c| c.score()).unwrap_or(0.0),
            "Ranked candidates"
        );
        scored
    }

    fn context_match(&self, adaptations: &[Adaptation], context: &Context) -> f64 {
        let mut alignment = 0.7;
        if self.night.contains(context.hour()) && adaptations.iter().any(|a| a.action == "dark_mode") {
            alignment += 0.2;
        }
        if context.device == DeviceClass::Mobile
            && adaptations
                .iter()
                .any(|a| a.action.contains("increase_click_area") || a.action.contains("simplify"))
        {
            alignment += 0.1;
        }
        if context.page_lower().contains("social") && adaptations.iter().any(|a| a.action.contains("enhanced")) {
            alignment += 0.1;
        }
        alignment
    }
}

fn mood_match(candidate: &AdaptationCandidate, mood: Mood) -> f64 {
    match candidate.source {
        CandidateSource::Rule => {
            let aligned = candidate
                .adaptations
                .iter()
                .filter(|a| aligns_with_mood(a, mood))
                .count();
            (0.5 + 0.2 * aligned as f64).min(1.0)
        }
        CandidateSource::Model => candidate.confidence,
        _ => 0.5,
    }
}

fn aligns_with_mood(adaptation: &Adaptation, mood: Mood) -> bool {
    let action = adaptation.action.as_str();
    match (adaptation.kind, mood) {
        (AdaptationKind::Visual, Mood::Stressed) => action.contains("reduce"),
        (AdaptationKind::Visual, Mood::Sad) => action.contains("warm"),
        (AdaptationKind::Visual, Mood::Focused) => action.contains("minimal"),
        (AdaptationKind::Content, Mood::Sad) => action.contains("positive"),
        (AdaptationKind::Content, Mood::Stressed) => action.contains("minimize"),
        _ => false,
    }
}

fn user_match(adaptations: &[Adaptation], context: &Context) -> f64 {
    let profile = &context.profile;
    let mut alignment = 0.5;
    for a in adaptations {
        if a.kind == AdaptationKind::Visual {
            if profile.visual.prefers_bright && a.action == "reduce_brightness" {
                alignment -= 0.1;
            } else if profile.visual.prefers_contrast && a.action == "increase_contrast" {
                alignment += 0.1;
            }
        }
        if a.action.contains("minimal") && profile.traits.openness < 0.3 {
            alignment += 0.1;
        } else if a.action.contains("dynamic") && profile.traits.openness > 0.7 {
            alignment += 0.1;
        }
    }
    alignment
}

/// Mean per-adaptation success rate; 0.5 for an empty candidate.
fn success_rate(adaptations: &[Adaptation], rates: &dyn SuccessRates) -> f64 {
    if adaptations.is_empty() {
        return 0.5;
    }
    adaptations.iter().map(|a| rates.rate(a)).sum::<f64>() / adaptations.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use attune_types::{MoodState, UserProfile};
    use chrono::NaiveDate;

    fn make_context(mood: Mood, hour: u32) -> Context {
        Context::new(
            MoodState::with_scalars(mood, 0.8, 0.5, 0.5, 0.5),
            UserProfile::default(),
            NaiveDate::from_ymd_opt(2024, 2, 20)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        )
    }

    fn candidate(source: CandidateSource, adaptations: Vec<Adaptation>, confidence: f64) -> AdaptationCandidate {
        AdaptationCandidate::new(source, adaptations, confidence)
    }

    #[test]
    fn default_weights() {
        let w = ScoringWeights::default();
        assert_eq!(w.as_array(), [0.3, 0.3, 0.2, 0.2]);
    }

    #[test]
    fn overall_stays_in_unit_range_with_heavy_weights() {
        let scorer = CandidateScorer::new(
            ScoringWeights {
                mood_match: 1.0,
                user_match: 1.0,
                context_match: 1.0,
                success_rate: 1.0,
            },
            NightWindow::default(),
        );
        let ctx = make_context(Mood::Stressed, 12);
        let c = candidate(CandidateSource::Rule, vec![Adaptation::visual("reduce_brightness")], 0.8);
        let (overall, b) = scorer.score(&c, &ctx, &NoHistory);
        assert_eq!(overall, 1.0);
        assert!((b.mood_match - 0.7).abs() < 1e-12);
    }

    #[test]
    fn rule_mood_alignment_adds_per_adaptation() {
        let scorer = CandidateScorer::default();
        let ctx = make_context(Mood::Stressed, 12);
        let c = candidate(
            CandidateSource::Rule,
            vec![
                Adaptation::visual("reduce_brightness"),
                Adaptation::content("minimize_notifications"),
                Adaptation::layout("reduce_clutter"),
            ],
            0.8,
        );
        let (_, b) = scorer.score(&c, &ctx, &NoHistory);
        assert!((b.mood_match - 0.9).abs() < 1e-12);
    }

    #[test]
    fn mood_alignment_is_capped() {
        let scorer = CandidateScorer::default();
        let ctx = make_context(Mood::Sad, 12);
        let c = candidate(
            CandidateSource::Rule,
            (0..5).map(|_| Adaptation::visual("warm_color_temperature")).collect(),
            0.7,
        );
        let (_, b) = scorer.score(&c, &ctx, &NoHistory);
        assert_eq!(b.mood_match, 1.0);
    }

    #[test]
    fn model_and_other_sources_mood_match() {
        let scorer = CandidateScorer::default();
        let ctx = make_context(Mood::Stressed, 12);
        let model = candidate(CandidateSource::Model, vec![Adaptation::visual("reduce_x")], 0.65);
        assert!((scorer.score(&model, &ctx, &NoHistory).1.mood_match - 0.65).abs() < 1e-12);
        let hist = candidate(CandidateSource::History, vec![Adaptation::visual("reduce_x")], 0.9);
        assert_eq!(scorer.score(&hist, &ctx, &NoHistory).1.mood_match, 0.5);
    }

    #[test]
    fn user_preferences_shift_match() {
        let scorer = CandidateScorer::default();
        let mut ctx = make_context(Mood::Neutral, 12);
        ctx.profile.visual.prefers_bright = true;
        ctx.profile.visual.prefers_contrast = true;
        ctx.profile.traits.openness = 0.9;
        let c = candidate(
            CandidateSource::Context,
            vec![
                Adaptation::visual("reduce_brightness"),
                Adaptation::visual("increase_contrast"),
                Adaptation::content("dynamic_content"),
                Adaptation::layout("minimal_distractions"),
            ],
            0.5,
        );
        let (_, b) = scorer.score(&c, &ctx, &NoHistory);
        // -0.1 + 0.1 + 0.1, minimal ignored at high openness
        assert!((b.user_match - 0.6).abs() < 1e-12);
    }

    #[test]
    fn context_bonuses() {
        let scorer = CandidateScorer::default();
        let night = make_context(Mood::Neutral, 23);
        let dark = candidate(CandidateSource::Context, vec![Adaptation::visual("dark_mode")], 0.9);
        assert!((scorer.score(&dark, &night, &NoHistory).1.context_match - 0.9).abs() < 1e-12);

        let mobile = make_context(Mood::Neutral, 12)
            .with_device(DeviceClass::Mobile)
            .with_page("social-feed");
        let c = candidate(
            CandidateSource::Rule,
            vec![
                Adaptation::interaction("increase_click_area"),
                Adaptation::interaction("enhanced_navigation"),
            ],
            0.8,
        );
        assert!((scorer.score(&c, &mobile, &NoHistory).1.context_match - 0.9).abs() < 1e-12);
    }

    #[test]
    fn success_rate_uses_patterns() {
        let scorer = CandidateScorer::default();
        let ctx = make_context(Mood::Neutral, 12);
        let mut patterns: HashMap<PatternKey, SuccessPattern> = HashMap::new();
        patterns.insert(
            PatternKey::of(&Adaptation::visual("dark_mode")),
            SuccessPattern {
                attempts: 4,
                successes: 3,
            },
        );
        let c = candidate(
            CandidateSource::History,
            vec![Adaptation::visual("dark_mode"), Adaptation::visual("unseen")],
            0.8,
        );
        let (_, b) = scorer.score(&c, &ctx, &patterns);
        assert!((b.success_rate - 0.625).abs() < 1e-12);

        let empty = candidate(CandidateSource::History, vec![], 0.8);
        assert_eq!(scorer.score(&empty, &ctx, &patterns).1.success_rate, 0.5);
    }

    #[test]
    fn rank_is_descending_and_stable() {
        let scorer = CandidateScorer::default();
        let ctx = make_context(Mood::Stressed, 12);
        let first = candidate(CandidateSource::Context, vec![Adaptation::layout("a")], 0.5);
        let second = candidate(CandidateSource::Context, vec![Adaptation::layout("b")], 0.5);
        let best = candidate(CandidateSource::Rule, vec![Adaptation::visual("reduce_brightness")], 0.8);
        let ranked = scorer.rank(vec![first, second, best], &ctx, &NoHistory);
        assert!(ranked[0].has_action("reduce_brightness"));
        assert!(ranked[1].has_action("a"));
        assert!(ranked[2].has_action("b"));
        assert!(ranked.iter().all(|c| c.breakdown.is_some()));
        // 0.3*0.7 + 0.3*0.5 + 0.2*0.7 + 0.2*0.5
        assert!((ranked[0].score() - 0.6).abs() < 1e-12);
    }
}
