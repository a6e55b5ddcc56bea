//! Capability traits of live components
//!
//! The driver never inspects concrete component types. It asks a
//! component for a capability (`Component::as_editable_mut`, ...) and acts
//! only when the capability is present.

use serde::Serialize;
use serde_json::Value;

use super::validator::Validator;

/// Prefix of every engine-generated component id
pub const UNIQUE_ID_PREFIX: &str = "j_id";

/// A component that can hold several children and therefore serve as a
/// facet slot on its own
pub trait ContainerCapable {
    /// Layout hint forwarded to the renderer (`block`, `group`, ...)
    fn layout(&self) -> Option<&str>;
}

/// A component carrying a value
pub trait ValueHolding {
    fn value(&self) -> Option<&Value>;
    fn set_value(&mut self, value: Value);
}

/// A value holder the user can edit, and which therefore takes validators
pub trait Editable: ValueHolding {
    fn submitted_value(&self) -> Option<&Value>;
    fn set_submitted_value(&mut self, value: Option<Value>);
    fn is_required(&self) -> bool;
    fn set_required(&mut self, required: bool);
    fn validators(&self) -> &[Validator];
    fn validators_mut(&mut self) -> &mut Vec<Validator>;
    /// Validator ids that must never be attached by default
    fn excluded_validator_ids(&self) -> &[String];
    fn exclude_validator(&mut self, validator_id: &str);
}

/// A naming authority producing component ids unique within its subtree
pub trait UniqueIdVendor {
    fn create_unique_id(&mut self, seed: Option<&str>) -> String;
}

/// A component accepting client behaviors (ajax and friends)
pub trait BehaviorHolder {
    fn default_event(&self) -> &str;
    fn behaviors(&self) -> &[ClientBehavior];
    /// Attach a behavior, replacing one previously attached by the same tag
    /// for the same event
    fn attach_behavior(&mut self, behavior: ClientBehavior);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelState {
    pub layout: Option<String>,
}

impl ContainerCapable for PanelState {
    fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueState {
    pub value: Option<Value>,
}

impl ValueHolding for ValueState {
    fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }
}

/// State of an editable component
///
/// Survives rebuilds together with the component, which is the whole
/// point of identity-stable reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditableState {
    pub value: Option<Value>,
    pub submitted_value: Option<Value>,
    pub required: bool,
    pub validators: Vec<Validator>,
    pub excluded_validator_ids: Vec<String>,
}

impl ValueHolding for EditableState {
    fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }
}

impl Editable for EditableState {
    fn submitted_value(&self) -> Option<&Value> {
        self.submitted_value.as_ref()
    }

    fn set_submitted_value(&mut self, value: Option<Value>) {
        self.submitted_value = value;
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    fn validators(&self) -> &[Validator] {
        &self.validators
    }

    fn validators_mut(&mut self) -> &mut Vec<Validator> {
        &mut self.validators
    }

    fn excluded_validator_ids(&self) -> &[String] {
        &self.excluded_validator_ids
    }

    fn exclude_validator(&mut self, validator_id: &str) {
        if !self.excluded_validator_ids.iter().any(|id| id == validator_id) {
            self.excluded_validator_ids.push(validator_id.to_string());
        }
    }
}

/// Counter-backed id vendor
///
/// Seeded requests are derived from the seed and never touch the counter,
/// so structural ids stay stable across passes. Unseeded requests (facet
/// wrappers) draw from a counter that only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VendorState {
    pub counter: u64,
}

impl UniqueIdVendor for VendorState {
    fn create_unique_id(&mut self, seed: Option<&str>) -> String {
        match seed {
            Some(seed) => format!("{}{}", UNIQUE_ID_PREFIX, seed),
            None => {
                let id = format!("{}{}", UNIQUE_ID_PREFIX, self.counter);
                self.counter += 1;
                id
            }
        }
    }
}

/// A behavior attached to a component for one client event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientBehavior {
    /// Tag-id of the template tag that attached it
    pub source_tag_id: String,
    pub event: String,
    pub execute: Option<String>,
    pub render: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorState {
    pub default_event: String,
    pub behaviors: Vec<ClientBehavior>,
}

impl BehaviorState {
    pub fn new(default_event: impl Into<String>) -> Self {
        Self {
            default_event: default_event.into(),
            behaviors: Vec::new(),
        }
    }
}

impl BehaviorHolder for BehaviorState {
    fn default_event(&self) -> &str {
        &self.default_event
    }

    fn behaviors(&self) -> &[ClientBehavior] {
        &self.behaviors
    }

    fn attach_behavior(&mut self, behavior: ClientBehavior) {
        match self.behaviors.iter_mut().find(|b| {
            b.source_tag_id == behavior.source_tag_id && b.event == behavior.event
        }) {
            Some(existing) => *existing = behavior,
            None => self.behaviors.push(behavior),
        }
    }
}
