pub mod capability;
pub mod component;
pub mod template;
pub mod tree;
pub mod validator;
pub mod view;

pub use capability::{
    BehaviorHolder, ClientBehavior, ContainerCapable, Editable, UniqueIdVendor, ValueHolding,
};
pub use component::{Component, ComponentKind, NodeKey};
pub use template::{AttrValue, BehaviorTag, ComponentTag, Template, TemplateNode, ValidatorTag};
pub use tree::ComponentTree;
pub use validator::Validator;
pub use view::View;
