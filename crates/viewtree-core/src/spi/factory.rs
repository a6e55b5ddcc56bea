use std::collections::BTreeMap;

use crate::errors::{EngineError, Result};
use crate::model::capability::{BehaviorState, ValueState, VendorState};
use crate::model::component::*;

/// Creates the capability state for a component type
pub trait NodeFactory {
    /// # Errors
    ///
    /// Returns `UnknownComponentType` when the type is not registered.
    fn create_node(&self, component_type: &str) -> Result<ComponentKind>;
}

/// Prototype table covering the standard HTML component set
///
/// Additional types are registered with `with_type`; `create_node` clones
/// the prototype.
#[derive(Debug, Clone)]
pub struct StandardNodeFactory {
    prototypes: BTreeMap<String, ComponentKind>,
}

impl Default for StandardNodeFactory {
    fn default() -> Self {
        let mut prototypes = BTreeMap::new();
        let mut add = |ty: &str, kind: ComponentKind| {
            prototypes.insert(ty.to_string(), kind);
        };
        add(FORM_TYPE, ComponentKind::Form(VendorState::default()));
        add(PANEL_TYPE, ComponentKind::panel());
        add(PANEL_GROUP_TYPE, ComponentKind::panel());
        add(PANEL_GRID_TYPE, ComponentKind::panel());
        add(OUTPUT_TEXT_TYPE, ComponentKind::Output(ValueState::default()));
        add(OUTPUT_LABEL_TYPE, ComponentKind::Output(ValueState::default()));
        add(INPUT_TEXT_TYPE, ComponentKind::input());
        add(INPUT_SECRET_TYPE, ComponentKind::input());
        add(INPUT_TEXTAREA_TYPE, ComponentKind::input());
        add(SELECT_ONE_MENU_TYPE, ComponentKind::input());
        add(COMMAND_BUTTON_TYPE, ComponentKind::command());
        add(COMMAND_LINK_TYPE, ComponentKind::command());
        add(COMPOSITE_TYPE, ComponentKind::Composite(BehaviorState::new("action")));
        Self { prototypes }
    }
}

impl StandardNodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a component type
    pub fn with_type(mut self, component_type: impl Into<String>, prototype: ComponentKind) -> Self {
        self.prototypes.insert(component_type.into(), prototype);
        self
    }
}

impl NodeFactory for StandardNodeFactory {
    fn create_node(&self, component_type: &str) -> Result<ComponentKind> {
        self.prototypes
            .get(component_type)
            .cloned()
            .ok_or_else(|| EngineError::UnknownComponentType {
                component_type: component_type.to_string(),
            })
    }
}
