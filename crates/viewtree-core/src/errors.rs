use thiserror::Error;
use viewtree_core_types::{BuildId, TraceId};

use crate::model::NodeKey;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every `EngineError` maps onto exactly one kind, and every kind has a
/// stable code that tests and callers can match on without depending on
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Tree structure
    /// Missing parent, unknown node key, or an id vendor that is not one
    InvalidTreeState,

    // Collaborator failures
    /// Propagated unchanged from the attribute binder or expression evaluator
    AttributeBindingFailure,
    /// Registry lookup or validator construction failed
    ConstraintInstantiationFailure,
    /// The node factory does not know the requested component type
    ComponentCreationFailure,

    // Inputs
    InvalidTemplate,
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidTreeState => "ERR_INVALID_TREE_STATE",
            ExErrorKind::AttributeBindingFailure => "ERR_ATTRIBUTE_BINDING",
            ExErrorKind::ConstraintInstantiationFailure => "ERR_CONSTRAINT_INSTANTIATION",
            ExErrorKind::ComponentCreationFailure => "ERR_COMPONENT_CREATION",
            ExErrorKind::InvalidTemplate => "ERR_INVALID_TEMPLATE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the tree coordinates (tag-id,
/// component id) of the node being built when the failure happened.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    tag_id: Option<String>,
    component_id: Option<String>,
    build_id: Option<BuildId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            tag_id: None,
            component_id: None,
            build_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add tag-id context
    pub fn with_tag_id(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_id = Some(tag_id.into());
        self
    }

    /// Add component id context
    pub fn with_component_id(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }

    /// Add build id context
    pub fn with_build_id(mut self, build_id: BuildId) -> Self {
        self.build_id = Some(build_id);
        self
    }

    /// Add trace id context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the tag-id context, if any
    pub fn tag_id(&self) -> Option<&str> {
        self.tag_id.as_deref()
    }

    /// Get the component id context, if any
    pub fn component_id(&self) -> Option<&str> {
        self.component_id.as_deref()
    }

    /// Get the build id context, if any
    pub fn build_id(&self) -> Option<&BuildId> {
        self.build_id.as_ref()
    }

    /// Get the trace id context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(tag_id) = &self.tag_id {
            write!(f, " (tag_id: {})", tag_id)?;
        }
        if let Some(component_id) = &self.component_id {
            write!(f, " (component_id: {})", component_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for tree construction and reconciliation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== Tree State Errors =====
    /// A tag was applied without a parent component in the tree
    #[error("Parent component missing for tag {tag}")]
    MissingParent { tag: String },

    /// A node key does not (or no longer) refer to a node of the tree
    #[error("Component {key} is not part of the tree")]
    NodeNotFound { key: NodeKey },

    /// The scope chain names a vendor node that cannot vend ids
    #[error("Component {key} is not a unique id vendor")]
    NotAnIdVendor { key: NodeKey },

    // ===== Collaborator Errors =====
    /// The node factory has no component registered for the type
    #[error("Unknown component type: {component_type}")]
    UnknownComponentType { component_type: String },

    /// An attribute could not be applied to a freshly created component
    #[error("Cannot bind attribute '{attribute}' on tag {tag}: {reason}")]
    AttributeBinding {
        tag: String,
        attribute: String,
        reason: String,
    },

    /// An attribute or id expression could not be evaluated
    #[error("Cannot evaluate expression '{expression}': {reason}")]
    ExpressionEvaluation { expression: String, reason: String },

    /// A validator could not be looked up or constructed
    #[error("Cannot instantiate validator {validator_id}: {reason}")]
    ConstraintInstantiation {
        validator_id: String,
        reason: String,
    },

    // ===== Template Errors =====
    /// The template document is malformed
    #[error("Invalid template: {reason}")]
    InvalidTemplate { reason: String },

    /// Two component tags share the same structural tag-id
    #[error("Duplicate tag id in template: {tag_id}")]
    DuplicateTagId { tag_id: String },

    /// A component tag reached the driver without a structural tag-id
    #[error("Tag {tag} has no tag id; compile the template before building")]
    UncompiledTemplate { tag: String },

    /// An attached-object tag sits under a component lacking the capability
    #[error("Tag {tag} requires a parent that is {capability}")]
    IncompatibleParent { tag: String, capability: String },

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Internal Errors =====
    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Kind of this error within the canonical taxonomy
    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }
}

/// Conversion from EngineError to ExError
///
/// Maps each variant to a kind and lifts its fields into the structured
/// context slots.
impl From<EngineError> for ExError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MissingParent { tag } => ExError::new(ExErrorKind::InvalidTreeState)
                .with_message(format!("Parent component was missing for tag {}", tag)),

            EngineError::NodeNotFound { key } => ExError::new(ExErrorKind::InvalidTreeState)
                .with_message(format!("Component {} is not part of the tree", key)),

            EngineError::NotAnIdVendor { key } => ExError::new(ExErrorKind::InvalidTreeState)
                .with_message(format!("Component {} cannot vend unique ids", key)),

            EngineError::UnknownComponentType { component_type } => {
                ExError::new(ExErrorKind::ComponentCreationFailure)
                    .with_message(format!("Unknown component type {}", component_type))
            }

            EngineError::AttributeBinding {
                tag,
                attribute,
                reason,
            } => ExError::new(ExErrorKind::AttributeBindingFailure)
                .with_message(format!("{} on {}: {}", attribute, tag, reason)),

            EngineError::ExpressionEvaluation { expression, reason } => {
                ExError::new(ExErrorKind::AttributeBindingFailure)
                    .with_message(format!("{}: {}", expression, reason))
            }

            EngineError::ConstraintInstantiation {
                validator_id,
                reason,
            } => ExError::new(ExErrorKind::ConstraintInstantiationFailure)
                .with_message(format!("{}: {}", validator_id, reason)),

            EngineError::InvalidTemplate { reason } => {
                ExError::new(ExErrorKind::InvalidTemplate).with_message(reason)
            }

            EngineError::DuplicateTagId { tag_id } => ExError::new(ExErrorKind::InvalidTemplate)
                .with_tag_id(tag_id)
                .with_message("Duplicate tag id"),

            EngineError::UncompiledTemplate { tag } => ExError::new(ExErrorKind::InvalidTemplate)
                .with_message(format!("Tag {} has no tag id", tag)),

            EngineError::IncompatibleParent { tag, capability } => {
                ExError::new(ExErrorKind::InvalidTemplate)
                    .with_message(format!("Tag {} requires a parent that is {}", tag, capability))
            }

            EngineError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            EngineError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),

            EngineError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            EngineError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to EngineError
impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io {
            message: err.to_string(),
        }
    }
}
