//! Adaptation instructions and the candidates that carry them.

use serde::{Deserialize, Serialize};

/// Which surface an adaptation acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptationKind {
    Visual,
    Layout,
    Content,
    Interaction,
}

impl std::fmt::Display for AdaptationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visual => write!(f, "visual"),
            Self::Layout => write!(f, "layout"),
            Self::Content => write!(f, "content"),
            Self::Interaction => write!(f, "interaction"),
        }
    }
}

/// A single interface instruction, e.g. `visual/reduce_brightness 0.2`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Adaptation {
    #[serde(rename = "type")]
    pub kind: AdaptationKind,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Adaptation {
    pub fn new(kind: AdaptationKind, action: impl Into<String>) -> Self {
        Self {
            kind,
            action: action.into(),
            amount: None,
        }
    }

    pub fn with_amount(kind: AdaptationKind, action: impl Into<String>, amount: f64) -> Self {
        Self {
            kind,
            action: action.into(),
            amount: Some(amount),
        }
    }

    pub fn visual(action: impl Into<String>) -> Self {
        Self::new(AdaptationKind::Visual, action)
    }

    pub fn layout(action: impl Into<String>) -> Self {
        Self::new(AdaptationKind::Layout, action)
    }

    pub fn content(action: impl Into<String>) -> Self {
        Self::new(AdaptationKind::Content, action)
    }

    pub fn interaction(action: impl Into<String>) -> Self {
        Self::new(AdaptationKind::Interaction, action)
    }

    /// Attach an amount, consuming self.
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
}

impl std::fmt::Display for Adaptation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.amount {
            Some(a) => write!(f, "{}/{} {}", self.kind, self.action, a),
            None => write!(f, "{}/{}", self.kind, self.action),
        }
    }
}

/// Which generator produced a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Rule,
    #[serde(rename = "ml")]
    Model,
    Context,
    History,
    Default,
}

/// The four weighted factors behind a candidate's overall score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub mood_match: f64,
    pub user_match: f64,
    pub context_match: f64,
    pub success_rate: f64,
}

/// A bundle of adaptations proposed by one generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdaptationCandidate {
    pub source: CandidateSource,
    pub adaptations: Vec<Adaptation>,
    /// Generator confidence (0.0 to 1.0).
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Filled in by the scorer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl AdaptationCandidate {
    /// Create an unscored candidate.
    pub fn new(source: CandidateSource, adaptations: Vec<Adaptation>, confidence: f64) -> Self {
        Self {
            source,
            adaptations,
            confidence: crate::clamp_unit(confidence),
            reasoning: None,
            overall_score: None,
            breakdown: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Score, or zero when not yet scored.
    pub fn score(&self) -> f64 {
        self.overall_score.unwrap_or(0.0)
    }

    /// Whether any adaptation in this candidate has the given action.
    pub fn has_action(&self, action: &str) -> bool {
        self.adaptations.iter().any(|a| a.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptation_display() {
        assert_eq!(
            Adaptation::visual("reduce_brightness").amount(0.2).to_string(),
            "visual/reduce_brightness 0.2"
        );
        assert_eq!(Adaptation::layout("hide_sidebar").to_string(), "layout/hide_sidebar");
    }

    #[test]
    fn adaptation_json_uses_type_key() {
        let json = serde_json::to_value(Adaptation::content("focus_mode")).unwrap();
        assert_eq!(json["type"], "content");
        assert_eq!(json["action"], "focus_mode");
        assert!(json.get("amount").is_none());
    }

    #[test]
    fn model_source_serializes_as_ml() {
        let json = serde_json::to_string(&CandidateSource::Model).unwrap();
        assert_eq!(json, "\"ml\"");
    }

    #[test]
    fn candidate_clamps_confidence() {
        let c = AdaptationCandidate::new(CandidateSource::Rule, vec![], 1.5);
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.score(), 0.0);
    }
}
