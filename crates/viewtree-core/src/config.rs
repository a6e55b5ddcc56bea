//! Engine configuration
//!
//! Loaded from TOML or built in code. Everything has a default, so an
//! empty document is a valid configuration.
//!
//! ```toml
//! project_stage = "development"
//! partial_state_saving = true
//! bean_validation_available = true
//!
//! [init_params]
//! "jakarta.faces.validator.DISABLE_DEFAULT_BEAN_VALIDATOR" = "false"
//!
//! [default_validators]
//! "jakarta.faces.Bean" = "jakarta.faces.validator.BeanValidator"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::{EngineError, Result};
use crate::model::validator::DISABLE_DEFAULT_BEAN_VALIDATOR_PARAM;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    Development,
    UnitTest,
    SystemTest,
    #[default]
    Production,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub project_stage: ProjectStage,
    /// Mark every visited component's initial state after it is built
    pub partial_state_saving: bool,
    /// Whether a bean validation provider is present at runtime
    pub bean_validation_available: bool,
    /// Raw init parameters (string keys and values)
    pub init_params: BTreeMap<String, String>,
    /// Default validators: validator id -> implementation identity
    pub default_validators: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            project_stage: ProjectStage::default(),
            partial_state_saving: true,
            bean_validation_available: true,
            init_params: BTreeMap::new(),
            default_validators: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the text is not valid TOML or has fields
    /// of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EngineError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `InvalidConfig` if it does not
    /// parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_project_stage(mut self, stage: ProjectStage) -> Self {
        self.project_stage = stage;
        self
    }

    pub fn with_default_validator(
        mut self,
        validator_id: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.default_validators
            .insert(validator_id.into(), implementation.into());
        self
    }

    pub fn with_init_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.init_params.insert(name.into(), value.into());
        self
    }

    pub fn init_param(&self, name: &str) -> Option<&str> {
        self.init_params.get(name).map(String::as_str)
    }

    pub fn is_development(&self) -> bool {
        self.project_stage == ProjectStage::Development
    }

    /// `DISABLE_DEFAULT_BEAN_VALIDATOR` set to `true`, in any case
    pub fn is_default_bean_validator_disabled(&self) -> bool {
        self.init_param(DISABLE_DEFAULT_BEAN_VALIDATOR_PARAM)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.project_stage, ProjectStage::Production);
        assert!(config.partial_state_saving);
    }

    #[test]
    fn test_disable_flag_is_case_insensitive() {
        let config = EngineConfig::default()
            .with_init_param(DISABLE_DEFAULT_BEAN_VALIDATOR_PARAM, "TRUE");
        assert!(config.is_default_bean_validator_disabled());

        let config = EngineConfig::default()
            .with_init_param(DISABLE_DEFAULT_BEAN_VALIDATOR_PARAM, "no");
        assert!(!config.is_default_bean_validator_disabled());
    }

    #[test]
    fn test_wrong_field_type_is_invalid_config() {
        let result = EngineConfig::from_toml_str("partial_state_saving = \"maybe\"");
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }
}
