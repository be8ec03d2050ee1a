//! Engine configuration (dungeon.toml)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Runtime settings of one DSL engine instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting of callback re-entries into the interpreter
    pub callback_depth_limit: usize,

    /// Component types instantiated after all other components of an entity
    pub deferred_components: Vec<String>,

    /// Context name the entity under construction is pushed as
    pub entity_context_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            callback_depth_limit: 64,
            deferred_components: vec!["ai_component".to_string()],
            entity_context_name: "entity".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.callback_depth_limit == 0 {
            return Err(ConfigError::ValidationError(
                "callback_depth_limit must be at least 1".to_string(),
            ));
        }
        if self.entity_context_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "entity_context_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether components of this type are instantiated in the second pass
    pub fn is_deferred(&self, type_name: &str) -> bool {
        self.deferred_components.iter().any(|name| name == type_name)
    }
}
