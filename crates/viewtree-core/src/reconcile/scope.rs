//! Build scope chain
//!
//! A `BuildScope` is one frame of contextual state (facet name, id vendor,
//! validator exclusions, ...) linked to the frame that encloses it.
//! Entering a region derives a child scope; leaving it drops the child.
//! Lookups walk from the innermost frame outwards.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::{EngineError, Result};
use crate::model::{ClientBehavior, ComponentTree, NodeKey};
use crate::spi::Variables;

/// A behavior declared by a wrapping tag, waiting for holders
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBehavior {
    pub source_tag_id: String,
    /// Explicit event; the holder's default event when absent
    pub event: Option<String>,
    pub execute: Option<String>,
    pub render: Option<String>,
    pub disabled: bool,
}

impl PendingBehavior {
    /// Resolve against a holder's default event
    pub fn for_holder(&self, default_event: &str) -> ClientBehavior {
        ClientBehavior {
            source_tag_id: self.source_tag_id.clone(),
            event: self
                .event
                .clone()
                .unwrap_or_else(|| default_event.to_string()),
            execute: self.execute.clone(),
            render: self.render.clone(),
            disabled: self.disabled,
        }
    }
}

#[derive(Debug, Clone)]
enum Frame {
    Root,
    Component { key: NodeKey, created: bool },
    IdVendor(NodeKey),
    Facet(String),
    ExcludedValidators(Vec<String>),
    ValidationGroups(String),
    Behaviors(Vec<PendingBehavior>),
    Variables(BTreeMap<String, Value>),
}

#[derive(Debug)]
pub struct BuildScope<'a> {
    parent: Option<&'a BuildScope<'a>>,
    frame: Frame,
}

impl BuildScope<'static> {
    /// The outermost scope of a build
    pub fn root() -> Self {
        Self {
            parent: None,
            frame: Frame::Root,
        }
    }
}

impl<'a> BuildScope<'a> {
    fn derive(&'a self, frame: Frame) -> BuildScope<'a> {
        BuildScope {
            parent: Some(self),
            frame,
        }
    }

    /// Enter a component; hides facet names set outside it
    ///
    /// `created` tells whether the component was created on this pass.
    pub fn with_component(&'a self, key: NodeKey, created: bool) -> BuildScope<'a> {
        self.derive(Frame::Component { key, created })
    }

    /// Make `key` the innermost id vendor
    pub fn with_id_vendor(&'a self, key: NodeKey) -> BuildScope<'a> {
        self.derive(Frame::IdVendor(key))
    }

    pub fn with_facet(&'a self, name: impl Into<String>) -> BuildScope<'a> {
        self.derive(Frame::Facet(name.into()))
    }

    pub fn with_excluded_validators(&'a self, validator_ids: Vec<String>) -> BuildScope<'a> {
        self.derive(Frame::ExcludedValidators(validator_ids))
    }

    pub fn with_validation_groups(&'a self, groups: impl Into<String>) -> BuildScope<'a> {
        self.derive(Frame::ValidationGroups(groups.into()))
    }

    pub fn with_behaviors(&'a self, behaviors: Vec<PendingBehavior>) -> BuildScope<'a> {
        self.derive(Frame::Behaviors(behaviors))
    }

    pub fn with_variables(&'a self, variables: BTreeMap<String, Value>) -> BuildScope<'a> {
        self.derive(Frame::Variables(variables))
    }

    /// Frames from innermost to outermost
    fn frames<'s>(&'s self) -> impl Iterator<Item = &'s Frame> + 's {
        let start: &'s BuildScope<'s> = self;
        std::iter::successors(Some(start), |scope| scope.parent).map(|scope| &scope.frame)
    }

    /// Facet name targeted by tags applied in this scope
    pub fn current_facet(&self) -> Option<&str> {
        for frame in self.frames() {
            match frame {
                Frame::Facet(name) => return Some(name),
                Frame::Component { .. } | Frame::Root => return None,
                _ => {}
            }
        }
        None
    }

    /// Whether `key` is the innermost component and was created on this
    /// pass
    pub fn is_new_component(&self, key: NodeKey) -> bool {
        self.frames()
            .find_map(|frame| match frame {
                Frame::Component { key: k, created } => Some(*k == key && *created),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Innermost id vendor, if any was entered
    pub fn current_id_vendor(&self) -> Option<NodeKey> {
        self.frames().find_map(|frame| match frame {
            Frame::IdVendor(key) => Some(*key),
            _ => None,
        })
    }

    /// Generate an id from the innermost vendor, falling back to the view
    /// root
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` or `NotAnIdVendor` if the vendor node is gone
    /// or lost its capability.
    pub fn generate_unique_id(&self, tree: &mut ComponentTree, seed: Option<&str>) -> Result<String> {
        match self.current_id_vendor() {
            Some(key) => {
                let vendor = tree
                    .get_mut(key)?
                    .as_id_vendor_mut()
                    .ok_or(EngineError::NotAnIdVendor { key })?;
                Ok(vendor.create_unique_id(seed))
            }
            None => tree.create_root_unique_id(seed),
        }
    }

    /// Whether an enclosing region excludes `validator_id`
    pub fn is_validator_excluded(&self, validator_id: &str) -> bool {
        self.frames().any(|frame| match frame {
            Frame::ExcludedValidators(ids) => ids.iter().any(|id| id == validator_id),
            _ => false,
        })
    }

    /// Validator ids excluded by enclosing regions, innermost first
    pub fn excluded_validator_ids(&self) -> Vec<&str> {
        self.frames()
            .filter_map(|frame| match frame {
                Frame::ExcludedValidators(ids) => Some(ids.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Nearest enclosing validation group declaration
    pub fn first_validation_group(&self) -> Option<&str> {
        self.frames().find_map(|frame| match frame {
            Frame::ValidationGroups(groups) => Some(groups.as_str()),
            _ => None,
        })
    }

    /// Behaviors of enclosing wrapping tags, outermost first
    pub fn behaviors(&self) -> Vec<&PendingBehavior> {
        let mut out: Vec<&PendingBehavior> = self
            .frames()
            .filter_map(|frame| match frame {
                Frame::Behaviors(behaviors) => Some(behaviors.iter().rev()),
                _ => None,
            })
            .flatten()
            .collect();
        out.reverse();
        out
    }

    /// Number of frames, root included
    pub fn depth(&self) -> usize {
        self.frames().count()
    }
}

impl Variables for BuildScope<'_> {
    fn variable(&self, name: &str) -> Option<&Value> {
        self.frames().find_map(|frame| match frame {
            Frame::Variables(vars) => vars.get(name),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::capability::VendorState;
    use crate::model::component::FORM_TYPE;
    use crate::model::ComponentKind;
    use serde_json::json;

    #[test]
    fn test_component_frame_hides_outer_facet() {
        let root = BuildScope::root();
        let facet = root.with_facet("header");
        assert_eq!(facet.current_facet(), Some("header"));

        let groups = facet.with_validation_groups("g");
        assert_eq!(groups.current_facet(), Some("header"));

        let inner = groups.with_component(NodeKey(3), false);
        assert_eq!(inner.current_facet(), None);
        assert_eq!(inner.first_validation_group(), Some("g"));
    }

    #[test]
    fn test_creation_flag_belongs_to_innermost_component() {
        let root = BuildScope::root();
        let outer = root.with_component(NodeKey(1), true);
        let inner = outer.with_component(NodeKey(2), false);
        let region = inner.with_excluded_validators(vec!["a".to_string()]);

        assert!(outer.is_new_component(NodeKey(1)));
        assert!(!region.is_new_component(NodeKey(2)));
        assert!(!region.is_new_component(NodeKey(1)));
        assert!(!root.is_new_component(NodeKey(1)));
    }

    #[test]
    fn test_innermost_vendor_wins_and_root_is_fallback() {
        let mut tree = ComponentTree::new("v");
        let form = tree.insert(FORM_TYPE, ComponentKind::Form(VendorState::default()));

        let root = BuildScope::root();
        assert_eq!(root.current_id_vendor(), None);
        assert_eq!(root.generate_unique_id(&mut tree, None).unwrap(), "j_id0");

        let scoped = root.with_id_vendor(form);
        assert_eq!(scoped.current_id_vendor(), Some(form));
        assert_eq!(scoped.generate_unique_id(&mut tree, None).unwrap(), "j_id0");
        assert_eq!(scoped.generate_unique_id(&mut tree, Some("t4")).unwrap(), "j_idt4");
        assert_eq!(root.generate_unique_id(&mut tree, None).unwrap(), "j_id1");
    }

    #[test]
    fn test_vendor_without_capability_fails() {
        let mut tree = ComponentTree::new("v");
        let panel = tree.insert("jakarta.faces.Panel", ComponentKind::panel());
        let root = BuildScope::root();
        let scoped = root.with_id_vendor(panel);
        let err = scoped.generate_unique_id(&mut tree, None).unwrap_err();
        assert!(matches!(err, EngineError::NotAnIdVendor { .. }));
    }

    #[test]
    fn test_exclusions_accumulate() {
        let root = BuildScope::root();
        let outer = root.with_excluded_validators(vec!["a".to_string()]);
        let inner = outer.with_excluded_validators(vec!["b".to_string()]);
        assert!(inner.is_validator_excluded("a"));
        assert!(inner.is_validator_excluded("b"));
        assert!(!outer.is_validator_excluded("b"));
        assert_eq!(inner.excluded_validator_ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_variables_shadow_outward() {
        let root = BuildScope::root();
        let mut outer_vars = BTreeMap::new();
        outer_vars.insert("x".to_string(), json!(1));
        outer_vars.insert("y".to_string(), json!(2));
        let outer = root.with_variables(outer_vars);
        let mut inner_vars = BTreeMap::new();
        inner_vars.insert("x".to_string(), json!(10));
        let inner = outer.with_variables(inner_vars);

        assert_eq!(inner.variable("x"), Some(&json!(10)));
        assert_eq!(inner.variable("y"), Some(&json!(2)));
        assert_eq!(inner.variable("z"), None);
    }

    #[test]
    fn test_behaviors_listed_outermost_first() {
        let pending = |id: &str| PendingBehavior {
            source_tag_id: id.to_string(),
            event: None,
            execute: None,
            render: None,
            disabled: false,
        };
        let root = BuildScope::root();
        let outer = root.with_behaviors(vec![pending("t1")]);
        let inner = outer.with_behaviors(vec![pending("t5")]);
        let ids: Vec<&str> = inner
            .behaviors()
            .iter()
            .map(|b| b.source_tag_id.as_str())
            .collect();
        assert_eq!(ids, vec!["t1", "t5"]);
        assert_eq!(inner.depth(), 3);

        let resolved = pending("t1").for_holder("click");
        assert_eq!(resolved.event, "click");
    }
}
