//! Routing configuration snapshot.
//!
//! A [`RouterConfig`] is read once per batch and never mutated while records
//! are being processed. Reloading means building a new snapshot.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::intent::IntentSpec;

pub const DEFAULT_INPUT_FIELD: &str = "message";
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// What happens to a record that matches no intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Send it to a dedicated last channel.
    #[default]
    RouteToFallback,
    /// Drop it silently.
    Discard,
    /// Fail the record.
    Error,
}

impl FallbackPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RouteToFallback => "route_to_fallback",
            Self::Discard => "discard",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    #[serde(default)]
    pub intents: Vec<IntentSpec>,
    #[serde(default, rename = "fallbackBehavior")]
    pub fallback: FallbackPolicy,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_input_field")]
    pub input_field: String,
    #[serde(default)]
    pub continue_on_fail: bool,
}

fn default_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_input_field() -> String {
    DEFAULT_INPUT_FIELD.to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            intents: Vec::new(),
            fallback: FallbackPolicy::default(),
            case_sensitive: false,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            input_field: default_input_field(),
            continue_on_fail: false,
        }
    }
}

impl RouterConfig {
    pub fn new(intents: Vec<IntentSpec>, fallback: FallbackPolicy) -> Self {
        Self {
            intents,
            fallback,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        tracing::debug!(
            path = %path.display(),
            intents = config.intents.len(),
            fallback = config.fallback.as_str(),
            "loaded router configuration"
        );
        Ok(config)
    }

    /// Check the invariants the topology and classifier rely on.
    ///
    /// Duplicate and empty intent keys are left to the topology builder, which
    /// reports them in the same way whether or not this pass ran.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigurationError::ThresholdOutOfRange(
                self.confidence_threshold,
            ));
        }
        for intent in &self.intents {
            let mut seen = HashSet::new();
            for parameter in &intent.parameters {
                if !seen.insert(parameter.name.as_str()) {
                    return Err(ConfigurationError::DuplicateParameter {
                        intent: intent.key.clone(),
                        parameter: parameter.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn intent(&self, key: &str) -> Option<&IntentSpec> {
        self.intents.iter().find(|i| i.key == key)
    }
}
