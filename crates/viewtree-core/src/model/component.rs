use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::capability::{
    BehaviorHolder, BehaviorState, ContainerCapable, Editable, EditableState, PanelState,
    UniqueIdVendor, ValueHolding, ValueState, VendorState,
};

// Standard component types understood by the default node factory
pub const VIEW_ROOT_TYPE: &str = "jakarta.faces.ViewRoot";
pub const FORM_TYPE: &str = "jakarta.faces.HtmlForm";
pub const PANEL_TYPE: &str = "jakarta.faces.Panel";
pub const PANEL_GROUP_TYPE: &str = "jakarta.faces.HtmlPanelGroup";
pub const PANEL_GRID_TYPE: &str = "jakarta.faces.HtmlPanelGrid";
pub const OUTPUT_TEXT_TYPE: &str = "jakarta.faces.HtmlOutputText";
pub const OUTPUT_LABEL_TYPE: &str = "jakarta.faces.HtmlOutputLabel";
pub const INPUT_TEXT_TYPE: &str = "jakarta.faces.HtmlInputText";
pub const INPUT_SECRET_TYPE: &str = "jakarta.faces.HtmlInputSecret";
pub const INPUT_TEXTAREA_TYPE: &str = "jakarta.faces.HtmlInputTextarea";
pub const SELECT_ONE_MENU_TYPE: &str = "jakarta.faces.HtmlSelectOneMenu";
pub const COMMAND_BUTTON_TYPE: &str = "jakarta.faces.HtmlCommandButton";
pub const COMMAND_LINK_TYPE: &str = "jakarta.faces.HtmlCommandLink";
pub const COMPOSITE_TYPE: &str = "jakarta.faces.Composite";

/// Arena identity of a live component
///
/// Keys are never reused within a tree, so holding on to a key across
/// passes and comparing it is an identity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey(pub(crate) u64);

impl NodeKey {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability variant of a live component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentKind {
    ViewRoot(VendorState),
    Form(VendorState),
    Panel(PanelState),
    Output(ValueState),
    Input {
        editable: EditableState,
        behaviors: BehaviorState,
    },
    Command(BehaviorState),
    Composite(BehaviorState),
    Generic,
}

impl ComponentKind {
    pub fn panel() -> Self {
        ComponentKind::Panel(PanelState::default())
    }

    pub fn input() -> Self {
        ComponentKind::Input {
            editable: EditableState::default(),
            behaviors: BehaviorState::new("valueChange"),
        }
    }

    pub fn command() -> Self {
        ComponentKind::Command(BehaviorState::new("action"))
    }
}

/// One live component of the tree
///
/// Engine bookkeeping (`created_by`, `pending_deletion`, `facet_wrapper`)
/// lives in dedicated fields; `attributes` holds user attributes only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub key: NodeKey,
    pub component_type: String,
    pub kind: ComponentKind,
    /// Rendered component id
    pub id: Option<String>,
    pub renderer_type: Option<String>,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
    pub facets: BTreeMap<String, NodeKey>,
    pub attributes: BTreeMap<String, Value>,
    /// Tag-id of the template tag that created this component
    pub created_by: Option<String>,
    #[serde(skip)]
    pub pending_deletion: bool,
    /// Set only on facet wrappers synthesized by the engine
    pub facet_wrapper: bool,
    pub view_location: Option<String>,
    pub initial_state_marked: bool,
    /// Binding expression this component is published under
    pub binding: Option<String>,
}

impl Component {
    pub(crate) fn new(key: NodeKey, component_type: String, kind: ComponentKind) -> Self {
        Self {
            key,
            component_type,
            kind,
            id: None,
            renderer_type: None,
            parent: None,
            children: Vec::new(),
            facets: BTreeMap::new(),
            attributes: BTreeMap::new(),
            created_by: None,
            pending_deletion: false,
            facet_wrapper: false,
            view_location: None,
            initial_state_marked: false,
            binding: None,
        }
    }

    /// Whether the engine (as opposed to application code) created this node
    pub fn is_engine_created(&self) -> bool {
        self.created_by.is_some()
    }

    pub fn is_naming_container(&self) -> bool {
        matches!(self.kind, ComponentKind::Form(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, ComponentKind::Composite(_))
    }

    pub fn facet(&self, name: &str) -> Option<NodeKey> {
        self.facets.get(name).copied()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn as_container(&self) -> Option<&dyn ContainerCapable> {
        match &self.kind {
            ComponentKind::Panel(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_value_holding(&self) -> Option<&dyn ValueHolding> {
        match &self.kind {
            ComponentKind::Output(state) => Some(state),
            ComponentKind::Input { editable, .. } => Some(editable),
            _ => None,
        }
    }

    pub fn as_value_holding_mut(&mut self) -> Option<&mut dyn ValueHolding> {
        match &mut self.kind {
            ComponentKind::Output(state) => Some(state),
            ComponentKind::Input { editable, .. } => Some(editable),
            _ => None,
        }
    }

    pub fn as_editable(&self) -> Option<&dyn Editable> {
        match &self.kind {
            ComponentKind::Input { editable, .. } => Some(editable),
            _ => None,
        }
    }

    pub fn as_editable_mut(&mut self) -> Option<&mut dyn Editable> {
        match &mut self.kind {
            ComponentKind::Input { editable, .. } => Some(editable),
            _ => None,
        }
    }

    pub fn as_id_vendor(&self) -> Option<&VendorState> {
        match &self.kind {
            ComponentKind::ViewRoot(state) | ComponentKind::Form(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_id_vendor_mut(&mut self) -> Option<&mut dyn UniqueIdVendor> {
        match &mut self.kind {
            ComponentKind::ViewRoot(state) | ComponentKind::Form(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_behavior_holder(&self) -> Option<&dyn BehaviorHolder> {
        match &self.kind {
            ComponentKind::Input { behaviors, .. }
            | ComponentKind::Command(behaviors)
            | ComponentKind::Composite(behaviors) => Some(behaviors),
            _ => None,
        }
    }

    pub fn as_behavior_holder_mut(&mut self) -> Option<&mut dyn BehaviorHolder> {
        match &mut self.kind {
            ComponentKind::Input { behaviors, .. }
            | ComponentKind::Command(behaviors)
            | ComponentKind::Composite(behaviors) => Some(behaviors),
            _ => None,
        }
    }
}
