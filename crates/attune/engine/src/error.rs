//! Error types for the Attune engine.

use attune_adaptation::AdaptationError;
use thiserror::Error;

/// Errors surfaced at the engine's edges.
#[derive(Debug, Error)]
pub enum AttuneError {
    /// Layered configuration could not be built or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rule table failed to compile.
    #[error("rule error: {0}")]
    Rules(#[from] AdaptationError),

    /// Rule file could not be read.
    #[error("failed to read rule file '{path}': {source}")]
    RuleFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A new cycle was requested after shutdown began.
    #[error("engine is shutting down")]
    ShuttingDown,
}

/// Result type for engine operations.
pub type AttuneResult<T> = Result<T, AttuneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = AttuneError::InvalidConfig("history_capacity must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: history_capacity must be positive"
        );
        assert_eq!(AttuneError::ShuttingDown.to_string(), "engine is shutting down");

        let err = AttuneError::RuleFileIo {
            path: "rules.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to read rule file 'rules.json': missing");
    }

    #[test]
    fn rule_errors_convert() {
        let err: AttuneError = AdaptationError::UnknownMood {
            rule: "r".into(),
            mood: "grumpy".into(),
        }
        .into();
        assert!(matches!(err, AttuneError::Rules(_)));
        assert_eq!(err.to_string(), "rule error: rule 'r': unknown mood 'grumpy'");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AttuneError>();
    }
}
