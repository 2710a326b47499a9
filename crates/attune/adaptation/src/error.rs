//! Error types for rule compilation and adaptation configuration.

use thiserror::Error;

/// Errors raised while loading or compiling adaptation rules.
#[derive(Debug, Error)]
pub enum AdaptationError {
    /// A condition key names a field rules cannot test.
    #[error("rule '{rule}': unknown condition field '{field}'")]
    UnknownField { rule: String, field: String },

    /// A condition key or value carries an unsupported comparison.
    #[error("rule '{rule}': unknown operator '{operator}'")]
    UnknownOperator { rule: String, operator: String },

    /// A threshold could not be read as a number.
    #[error("rule '{rule}': invalid threshold '{value}' for '{field}'")]
    InvalidThreshold {
        rule: String,
        field: String,
        value: String,
    },

    /// A mood condition names no known mood.
    #[error("rule '{rule}': unknown mood '{mood}'")]
    UnknownMood { rule: String, mood: String },

    /// Rule confidence is outside `[0, 1]`.
    #[error("rule '{rule}': confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange { rule: String, value: f64 },

    /// The rule file is not valid JSON for a rule list.
    #[error("rule file parse error: {0}")]
    RuleFile(#[from] serde_json::Error),
}

/// Result type for adaptation operations.
pub type AdaptationResult<T> = Result<T, AdaptationError>;
