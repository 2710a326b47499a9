//! Declarative rule table: typed predicates over the fused mood state.
//!
//! Rules are authored in JSON using the key convention (`mood`,
//! `arousal_gt`, `energy_lte`, ...) or an operator prefix in the value
//! (`{"arousal": ">0.8"}`). Both forms compile once into [`Predicate`]s;
//! anything unrecognised is rejected at load time.

use std::collections::BTreeMap;

use attune_types::{Adaptation, Mood, MoodState};
use serde::{Deserialize, Serialize};

use crate::error::{AdaptationError, AdaptationResult};

// ── Predicates ──────────────────────────────────────────────────────────

/// Numeric mood-state field a rule can compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarField {
    Energy,
    Valence,
    Arousal,
    Confidence,
}

impl ScalarField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "energy" => Some(Self::Energy),
            "valence" => Some(Self::Valence),
            "arousal" => Some(Self::Arousal),
            "confidence" => Some(Self::Confidence),
            _ => None,
        }
    }

    pub fn read(&self, state: &MoodState) -> f64 {
        match self {
            Self::Energy => state.energy,
            Self::Valence => state.valence,
            Self::Arousal => state.arousal,
            Self::Confidence => state.confidence,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
}

impl Comparator {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "gte" => Some(Self::Gte),
            "lte" => Some(Self::Lte),
            "eq" => Some(Self::Eq),
            _ => None,
        }
    }

    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Lt => value < threshold,
            Self::Gte => value >= threshold,
            Self::Lte => value <= threshold,
            Self::Eq => (value - threshold).abs() < f64::EPSILON,
        }
    }
}

/// A single typed rule condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// The primary mood equals the given mood.
    MoodEquals(Mood),
    /// A scalar field compared against a threshold.
    Compare(ScalarField, Comparator, f64),
}

impl Predicate {
    pub fn holds(&self, state: &MoodState) -> bool {
        match self {
            Self::MoodEquals(mood) => state.primary_mood == *mood,
            Self::Compare(field, cmp, threshold) => cmp.holds(field.read(state), *threshold),
        }
    }
}

// ── Rules ───────────────────────────────────────────────────────────────

/// A compiled condition → adaptation mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub conditions: Vec<Predicate>,
    pub adaptations: Vec<Adaptation>,
    pub confidence: f64,
}

impl Rule {
    /// True when every condition holds. A rule with no conditions always matches.
    pub fn matches(&self, state: &MoodState) -> bool {
        self.conditions.iter().all(|p| p.holds(state))
    }
}

/// A rule as written in a rule file, before compilation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default)]
    pub conditions: BTreeMap<String, serde_json::Value>,
    pub adaptations: Vec<Adaptation>,
    pub confidence: f64,
}

impl RuleSpec {
    /// Compile into a typed [`Rule`].
    pub fn compile(&self) -> AdaptationResult<Rule> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(AdaptationError::ConfidenceOutOfRange {
                rule: self.name.clone(),
                value: self.confidence,
            });
        }
        let conditions = self
            .conditions
            .iter()
            .map(|(key, value)| self.compile_condition(key, value))
            .collect::<AdaptationResult<Vec<_>>>()?;
        Ok(Rule {
            name: self.name.clone(),
            conditions,
            adaptations: self.adaptations.clone(),
            confidence: self.confidence,
        })
    }

    fn compile_condition(&self, key: &str, value: &serde_json::Value) -> AdaptationResult<Predicate> {
        if key == "mood" {
            let text = value.as_str().unwrap_or_default();
            return text
                .parse::<Mood>()
                .map(Predicate::MoodEquals)
                .map_err(|_| AdaptationError::UnknownMood {
                    rule: self.name.clone(),
                    mood: value.to_string(),
                });
        }

        if let Some((field_name, op)) = key.rsplit_once('_') {
            let field = self.field(field_name)?;
            let cmp = Comparator::parse(op).ok_or_else(|| AdaptationError::UnknownOperator {
                rule: self.name.clone(),
                operator: op.to_string(),
            })?;
            let threshold = self.threshold(key, value, value.as_str().unwrap_or_default())?;
            return Ok(Predicate::Compare(field, cmp, threshold));
        }

        let field = self.field(key)?;
        match value {
            serde_json::Value::String(text) => {
                let text = text.trim();
                let (cmp, rest) = split_operator(text);
                Ok(Predicate::Compare(field, cmp, self.threshold(key, value, rest)?))
            }
            _ => Ok(Predicate::Compare(field, Comparator::Eq, self.threshold(key, value, "")?)),
        }
    }

    fn field(&self, name: &str) -> AdaptationResult<ScalarField> {
        ScalarField::parse(name).ok_or_else(|| AdaptationError::UnknownField {
            rule: self.name.clone(),
            field: name.to_string(),
        })
    }

    fn threshold(&self, key: &str, value: &serde_json::Value, text: &str) -> AdaptationResult<f64> {
        let parsed = match value.as_f64() {
            Some(n) => Some(n),
            None => text.trim().parse::<f64>().ok(),
        };
        parsed
            .filter(|n| n.is_finite())
            .ok_or_else(|| AdaptationError::InvalidThreshold {
                rule: self.name.clone(),
                field: key.to_string(),
                value: value.to_string(),
            })
    }
}

/// Split a leading comparison operator off a condition value.
fn split_operator(text: &str) -> (Comparator, &str) {
    for (prefix, cmp) in [
        (">=", Comparator::Gte),
        ("<=", Comparator::Lte),
        (">", Comparator::Gt),
        ("<", Comparator::Lt),
        ("=", Comparator::Eq),
    ] {
        if let Some(rest) = text.strip_prefix(prefix) {
            return (cmp, rest);
        }
    }
    (Comparator::Eq, text)
}

// ── Rule Table ──────────────────────────────────────────────────────────

/// Static set of compiled rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compile a list of rule specs; the first bad rule aborts the load.
    pub fn from_specs(specs: &[RuleSpec]) -> AdaptationResult<Self> {
        let rules = specs.iter().map(RuleSpec::compile).collect::<AdaptationResult<_>>()?;
        Ok(Self { rules })
    }

    /// Parse a JSON array of rule specs.
    pub fn from_json(json: &str) -> AdaptationResult<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(json)?;
        Self::from_specs(&specs)
    }

    /// The four built-in rules.
    pub fn builtin() -> Self {
        use Comparator::{Gt, Lt};
        use ScalarField::{Arousal, Energy, Valence};

        let rule = |name: &str, mood, field, cmp, threshold, adaptations, confidence| Rule {
            name: name.to_string(),
            conditions: vec![Predicate::MoodEquals(mood), Predicate::Compare(field, cmp, threshold)],
            adaptations,
            confidence,
        };

        Self::new(vec![
            rule(
                "stress_reduction",
                Mood::Stressed,
                Arousal,
                Gt,
                0.8,
                vec![
                    Adaptation::visual("reduce_brightness").amount(0.2),
                    Adaptation::visual("simplify_layout"),
                    Adaptation::content("minimize_notifications"),
                    Adaptation::interaction("increase_click_area").amount(1.3),
                ],
                0.8,
            ),
            rule(
                "focus_enhancement",
                Mood::Focused,
                Energy,
                Gt,
                0.7,
                vec![
                    Adaptation::layout("hide_sidebar"),
                    Adaptation::visual("increase_contrast").amount(1.1),
                    Adaptation::content("block_distractions"),
                    Adaptation::interaction("keyboard_shortcuts_enable"),
                ],
                0.9,
            ),
            rule(
                "mood_lifting",
                Mood::Sad,
                Valence,
                Lt,
                0.3,
                vec![
                    Adaptation::visual("warm_color_temperature"),
                    Adaptation::content("positive_content_filter"),
                    Adaptation::layout("increase_spacing").amount(1.2),
                    Adaptation::interaction("gentle_animations"),
                ],
                0.7,
            ),
            rule(
                "engagement_boost",
                Mood::Bored,
                Energy,
                Lt,
                0.3,
                vec![
                    Adaptation::visual("increase_brightness").amount(1.1),
                    Adaptation::content("dynamic_content"),
                    Adaptation::interaction("enhanced_navigation"),
                    Adaptation::layout("rich_toolbar"),
                ],
                0.8,
            ),
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose conditions all hold for `state`, in table order.
    pub fn matching<'a, 's>(&'a self, state: &'s MoodState) -> impl Iterator<Item = &'a Rule> + 's
    where
        'a: 's,
    {
        self.rules.iter().filter(move |r| r.matches(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stressed(arousal: f64) -> MoodState {
        MoodState::with_scalars(Mood::Stressed, 0.8, 0.7, 0.3, arousal)
    }

    #[test]
    fn builtin_stress_rule_matches() {
        let table = RuleTable::builtin();
        assert_eq!(table.len(), 4);
        let names: Vec<&str> = table.matching(&stressed(0.9)).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["stress_reduction"]);
        assert_eq!(table.matching(&stressed(0.8)).count(), 0);
    }

    #[test]
    fn matched_rules_outlive_the_state() {
        let table = RuleTable::builtin();
        let matched: Vec<&Rule> = table.matching(&stressed(0.95)).collect();
        let sad = MoodState::with_scalars(Mood::Sad, 0.8, 0.3, 0.1, 0.3);
        let lifted: Vec<&Rule> = table.matching(&sad).collect();
        drop(sad);
        assert_eq!(matched.len(), 1);
        assert_eq!(lifted[0].name, "mood_lifting");
    }

    #[test]
    fn key_convention_compiles() {
        let json = r#"[{
            "name": "calm_down",
            "conditions": {"mood": "stressed", "arousal_gt": 0.8, "energy_lte": "0.9"},
            "adaptations": [{"type": "visual", "action": "reduce_brightness", "amount": 0.2}],
            "confidence": 0.8
        }]"#;
        let table = RuleTable::from_json(json).unwrap();
        let rule = &table.rules()[0];
        assert_eq!(rule.conditions.len(), 3);
        assert!(rule.conditions.contains(&Predicate::Compare(ScalarField::Arousal, Comparator::Gt, 0.8)));
        assert!(rule.conditions.contains(&Predicate::Compare(ScalarField::Energy, Comparator::Lte, 0.9)));
        assert!(rule.matches(&stressed(0.95)));
        assert!(!rule.matches(&stressed(0.5)));
    }

    #[test]
    fn operator_prefix_compiles() {
        let spec = RuleSpec {
            name: "lift".into(),
            conditions: BTreeMap::from([
                ("mood".to_string(), serde_json::json!("sad")),
                ("valence".to_string(), serde_json::json!("<0.3")),
                ("confidence".to_string(), serde_json::json!(">= 0.5")),
            ]),
            adaptations: vec![Adaptation::visual("warm_color_temperature")],
            confidence: 0.7,
        };
        let rule = spec.compile().unwrap();
        assert!(rule.conditions.contains(&Predicate::Compare(ScalarField::Valence, Comparator::Lt, 0.3)));
        assert!(rule.conditions.contains(&Predicate::Compare(ScalarField::Confidence, Comparator::Gte, 0.5)));
    }

    #[test]
    fn unknown_field_rejected() {
        let json = r#"[{"name": "r", "conditions": {"pulse_gt": 90}, "adaptations": [], "confidence": 0.5}]"#;
        assert!(matches!(
            RuleTable::from_json(json),
            Err(AdaptationError::UnknownField { .. })
        ));
    }

    #[test]
    fn unknown_operator_rejected() {
        let json = r#"[{"name": "r", "conditions": {"energy_ne": 0.5}, "adaptations": [], "confidence": 0.5}]"#;
        assert!(matches!(
            RuleTable::from_json(json),
            Err(AdaptationError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn bad_threshold_and_mood_rejected() {
        let json = r#"[{"name": "r", "conditions": {"energy": ">high"}, "adaptations": [], "confidence": 0.5}]"#;
        assert!(matches!(
            RuleTable::from_json(json),
            Err(AdaptationError::InvalidThreshold { .. })
        ));
        let json = r#"[{"name": "r", "conditions": {"mood": "furious"}, "adaptations": [], "confidence": 0.5}]"#;
        assert!(matches!(RuleTable::from_json(json), Err(AdaptationError::UnknownMood { .. })));
    }

    #[test]
    fn confidence_range_checked() {
        let json = r#"[{"name": "r", "conditions": {}, "adaptations": [], "confidence": 1.2}]"#;
        assert!(matches!(
            RuleTable::from_json(json),
            Err(AdaptationError::ConfidenceOutOfRange { .. })
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(RuleTable::from_json("{"), Err(AdaptationError::RuleFile(_))));
    }
}
