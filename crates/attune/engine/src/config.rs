//! Aggregated engine configuration.
//!
//! Sources are layered lowest to highest: built-in defaults, an optional
//! file, then `ATTUNE__`-prefixed environment variables
//! (e.g. `ATTUNE__LEARNING__RETRAIN_INTERVAL=25`).

use attune_adaptation::{GenerationConfig, ModelKind, ScoringWeights, SelectionConfig};
use attune_fusion::FusionConfig;
use attune_learning::LearningConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AttuneError, AttuneResult};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttuneConfig {
    pub fusion: FusionConfig,
    pub generation: GenerationConfig,
    pub scoring: ScoringWeights,
    pub selection: SelectionConfig,
    pub learning: LearningConfig,
    pub model: ModelKind,
    /// JSON rule file; the built-in table is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<String>,
    pub logging: LoggingConfig,
}

impl AttuneConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&str>) -> AttuneResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&AttuneConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ATTUNE")
                .separator("__")
                .try_parsing(true),
        );

        let config: AttuneConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        info!(
            model = ?config.model,
            rules = config.rules_path.as_deref().unwrap_or("builtin"),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Reject configurations the pipeline cannot honour.
    pub fn validate(&self) -> AttuneResult<()> {
        let positive = [
            ("fusion.history_capacity", self.fusion.history_capacity),
            ("learning.record_capacity", self.learning.record_capacity),
            ("learning.corpus_capacity", self.learning.corpus_capacity),
            ("generation.top_k", self.generation.top_k),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(invalid(format!("{name} must be positive")));
            }
        }
        if self.learning.retrain_interval == 0 {
            return Err(invalid("learning.retrain_interval must be positive".into()));
        }
        if self.fusion.current_window_secs <= 0 || self.fusion.trend_window_secs <= 0 {
            return Err(invalid("fusion windows must be positive".into()));
        }

        let r = &self.fusion.reliability;
        let mut unit = vec![
            ("fusion.reliability.pulse", r.pulse),
            ("fusion.reliability.temperature", r.temperature),
            ("fusion.reliability.interaction", r.interaction),
            ("fusion.reliability.facial", r.facial),
            ("scoring.mood_match", self.scoring.mood_match),
            ("scoring.user_match", self.scoring.user_match),
            ("scoring.context_match", self.scoring.context_match),
            ("scoring.success_rate", self.scoring.success_rate),
            ("selection.score_weight", self.selection.score_weight),
            ("generation.night_confidence", self.generation.night_confidence),
            ("generation.similarity_threshold", self.generation.similarity_threshold),
        ];
        for bundle in &self.generation.keyword_bundles {
            unit.push(("generation.keyword_bundles.confidence", bundle.confidence));
        }
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} = {value} is outside [0, 1]")));
            }
        }

        let weight_sum: f64 = self.scoring.as_array().iter().sum();
        if weight_sum > 1.0 + 1e-9 {
            return Err(invalid(format!("scoring weights sum to {weight_sum}, must be at most 1")));
        }

        if !self.selection.budget.is_finite() || self.selection.budget < 0.0 {
            return Err(invalid("selection.budget must be a non-negative number".into()));
        }

        let night = &self.generation.night;
        if night.start_hour > 23 || night.end_hour > 23 {
            return Err(invalid(format!(
                "generation.night hours must be 0-23, got {}-{}",
                night.start_hour, night.end_hour
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> AttuneError {
    AttuneError::InvalidConfig(message)
}
