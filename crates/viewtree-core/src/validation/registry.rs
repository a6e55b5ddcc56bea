use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::errors::{EngineError, Result};
use crate::model::validator::{BEAN_VALIDATOR_CLASS, BEAN_VALIDATOR_ID};
use crate::model::Validator;

/// Source of validator definitions
pub trait ConstraintRegistry {
    /// `(validator_id, implementation)` pairs attached to every editable
    /// component, in a deterministic order
    fn default_validators(&self) -> Vec<(String, String)>;

    /// Instantiate the validator registered under `validator_id`
    ///
    /// # Errors
    ///
    /// Returns `ConstraintInstantiation` for unknown ids.
    fn create_validator(&self, validator_id: &str) -> Result<Validator>;
}

const STANDARD_VALIDATORS: &[(&str, &str)] = &[
    (BEAN_VALIDATOR_ID, BEAN_VALIDATOR_CLASS),
    ("jakarta.faces.Required", "jakarta.faces.validator.RequiredValidator"),
    ("jakarta.faces.Length", "jakarta.faces.validator.LengthValidator"),
    ("jakarta.faces.LongRange", "jakarta.faces.validator.LongRangeValidator"),
    ("jakarta.faces.DoubleRange", "jakarta.faces.validator.DoubleRangeValidator"),
    ("jakarta.faces.RegularExpression", "jakarta.faces.validator.RegexValidator"),
];

/// Registry holding the standard validators plus whatever the
/// configuration declares
///
/// Configured defaults are also registered, so a default validator can
/// always be instantiated.
#[derive(Debug, Clone, Default)]
pub struct StandardConstraintRegistry {
    known: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
}

impl StandardConstraintRegistry {
    pub fn new() -> Self {
        let known = STANDARD_VALIDATORS
            .iter()
            .map(|(id, class)| (id.to_string(), class.to_string()))
            .collect();
        Self {
            known,
            defaults: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut registry = Self::new();
        for (id, implementation) in &config.default_validators {
            registry = registry.with_default(id.clone(), implementation.clone());
        }
        registry
    }

    /// Register a validator without making it a default
    pub fn with_validator(
        mut self,
        validator_id: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.known.insert(validator_id.into(), implementation.into());
        self
    }

    /// Register a validator and make it a default
    pub fn with_default(
        mut self,
        validator_id: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        let validator_id = validator_id.into();
        let implementation = implementation.into();
        self.known
            .insert(validator_id.clone(), implementation.clone());
        self.defaults.insert(validator_id, implementation);
        self
    }
}

impl ConstraintRegistry for StandardConstraintRegistry {
    fn default_validators(&self) -> Vec<(String, String)> {
        self.defaults
            .iter()
            .map(|(id, class)| (id.clone(), class.clone()))
            .collect()
    }

    fn create_validator(&self, validator_id: &str) -> Result<Validator> {
        self.known
            .get(validator_id)
            .map(|implementation| Validator::new(validator_id, implementation.clone()))
            .ok_or_else(|| EngineError::ConstraintInstantiation {
                validator_id: validator_id.to_string(),
                reason: "no validator registered under this id".to_string(),
            })
    }
}
