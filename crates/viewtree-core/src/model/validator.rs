use serde::{Deserialize, Serialize};

/// Validator id of the bean validator
pub const BEAN_VALIDATOR_ID: &str = "jakarta.faces.Bean";

/// Implementation identity of the bean validator
pub const BEAN_VALIDATOR_CLASS: &str = "jakarta.faces.validator.BeanValidator";

/// Group assigned to a bean validator when nothing else applies
pub const DEFAULT_VALIDATION_GROUP: &str = "jakarta.validation.groups.Default";

/// Init parameter switching off the default bean validator
pub const DISABLE_DEFAULT_BEAN_VALIDATOR_PARAM: &str =
    "jakarta.faces.validator.DISABLE_DEFAULT_BEAN_VALIDATOR";

/// A validation constraint attached to an editable component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Registry id (e.g. `jakarta.faces.Length`)
    pub validator_id: String,
    /// Implementation identity; two validators with the same implementation
    /// are the same constraint
    pub implementation: String,
    /// Comma separated validation groups (bean validator only)
    pub validation_groups: Option<String>,
}

impl Validator {
    pub fn new(validator_id: impl Into<String>, implementation: impl Into<String>) -> Self {
        Self {
            validator_id: validator_id.into(),
            implementation: implementation.into(),
            validation_groups: None,
        }
    }

    pub fn is_bean_validator(&self) -> bool {
        self.implementation == BEAN_VALIDATOR_CLASS
    }

    /// True when no validation group has been specified
    ///
    /// A group list made only of separators and non-word characters counts
    /// as empty.
    pub fn has_empty_validation_groups(&self) -> bool {
        match &self.validation_groups {
            None => true,
            Some(groups) => groups
                .chars()
                .all(|c| !(c.is_alphanumeric() || c == '_')),
        }
    }
}
