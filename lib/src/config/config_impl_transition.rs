// lib/src/config/config_impl_transition.rs
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, error, info};
use models::{GraphError, GraphResult};

use crate::config::config_structs::{ReappearConfig, TransitionConfig, TransitionMode};
use crate::matching::crisp::MatchThresholds;

impl FromStr for TransitionMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crisp" => Ok(TransitionMode::Crisp),
            "fuzzy" => Ok(TransitionMode::Fuzzy),
            _ => {
                error!("Unknown transition mode: {}", s);
                Err(GraphError::ConfigError(format!(
                    "unknown transition mode '{}', expected 'crisp' or 'fuzzy'",
                    s
                )))
            }
        }
    }
}

impl fmt::Display for TransitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionMode::Crisp => f.write_str("crisp"),
            TransitionMode::Fuzzy => f.write_str("fuzzy"),
        }
    }
}

impl ReappearConfig {
    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            threshold_passed: self.threshold_passed,
            threshold_criteria: self.threshold_criteria,
        }
    }
}

impl TransitionConfig {
    /// Parses and validates a TOML document; absent keys take their defaults.
    pub fn from_toml_str(content: &str) -> GraphResult<Self> {
        let config: TransitionConfig = toml::from_str(content)?;
        config.validate()?;
        debug!("Parsed transition config: {:?}", config);
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> GraphResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded transition config from {:?} (mode: {})", path, config.mode);
        Ok(config)
    }

    pub fn to_toml_string(&self) -> GraphResult<String> {
        toml::to_string(self)
            .map_err(|e| GraphError::SerializationError(format!("TOML serialization error: {}", e)))
    }

    /// Rejects thresholds outside `(0, 1]`. Limiters are checked while
    /// deserializing.
    pub fn validate(&self) -> GraphResult<()> {
        self.crisp.validate()?;
        self.reappear.thresholds().validate()?;
        Ok(())
    }
}
