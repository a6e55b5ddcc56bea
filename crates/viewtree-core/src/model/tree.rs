use std::collections::HashMap;

use super::capability::VendorState;
use super::component::{Component, ComponentKind, NodeKey, VIEW_ROOT_TYPE};
use crate::errors::{EngineError, Result};

/// Arena holding every live component of one view
///
/// Nodes own their children through key lists; the arena owns the nodes.
/// Removing a node drops its whole subtree. Not thread-safe on its own:
/// a tree has exactly one writer, the build that borrows it mutably.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    nodes: HashMap<NodeKey, Component>,
    next_key: u64,
    root: NodeKey,
    /// Binding expression -> bound component
    bindings: HashMap<String, NodeKey>,
}

impl ComponentTree {
    /// Create a tree holding only a view root with the given id
    pub fn new(view_id: impl Into<String>) -> Self {
        let root = NodeKey(0);
        let mut root_component = Component::new(
            root,
            VIEW_ROOT_TYPE.to_string(),
            ComponentKind::ViewRoot(VendorState::default()),
        );
        root_component.id = Some(view_id.into());

        let mut nodes = HashMap::new();
        nodes.insert(root, root_component);

        Self {
            nodes,
            next_key: 1,
            root,
            bindings: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of live nodes, view root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Get a component by key
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the key does not refer to a live node.
    pub fn get(&self, key: NodeKey) -> Result<&Component> {
        self.nodes
            .get(&key)
            .ok_or(EngineError::NodeNotFound { key })
    }

    /// Get a mutable component by key
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the key does not refer to a live node.
    pub fn get_mut(&mut self, key: NodeKey) -> Result<&mut Component> {
        self.nodes
            .get_mut(&key)
            .ok_or(EngineError::NodeNotFound { key })
    }

    /// Insert a detached component and return its key
    pub fn insert(&mut self, component_type: impl Into<String>, kind: ComponentKind) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes
            .insert(key, Component::new(key, component_type.into(), kind));
        key
    }

    /// Ordered children of a component (empty for unknown keys)
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(&key)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// Facet slot of a component
    pub fn facet(&self, key: NodeKey, name: &str) -> Option<NodeKey> {
        self.nodes.get(&key).and_then(|c| c.facet(name))
    }

    /// Append `child` to the children of `parent`
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if either node is missing.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Install `child` as the facet slot `name` of `parent`
    ///
    /// Returns the previous slot node, which is detached but still alive.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if either node is missing.
    pub fn set_facet(&mut self, parent: NodeKey, name: &str, child: NodeKey) -> Result<Option<NodeKey>> {
        self.get_mut(child)?.parent = Some(parent);
        Ok(self.get_mut(parent)?.facets.insert(name.to_string(), child))
    }

    /// Remove a node and its whole subtree from the arena
    ///
    /// The node is also unlinked from its parent's children or facets.
    /// Returns the number of nodes dropped.
    pub fn remove_subtree(&mut self, key: NodeKey) -> usize {
        if key == self.root {
            return 0;
        }
        if let Some(parent) = self.nodes.get(&key).and_then(|c| c.parent) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|k| *k != key);
                p.facets.retain(|_, k| *k != key);
            }
        }

        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            if let Some(component) = self.nodes.remove(&next) {
                stack.extend(component.children.iter().copied());
                stack.extend(component.facets.values().copied());
                removed += 1;
            }
        }
        let nodes = &self.nodes;
        self.bindings.retain(|_, k| nodes.contains_key(k));
        removed
    }

    /// Publish `key` under a binding expression, replacing any previous
    /// holder
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `key` is not a live node.
    pub fn bind(&mut self, expression: impl Into<String>, key: NodeKey) -> Result<()> {
        let expression = expression.into();
        self.get_mut(key)?.binding = Some(expression.clone());
        self.bindings.insert(expression, key);
        Ok(())
    }

    /// Live component published under `expression`
    pub fn bound(&self, expression: &str) -> Option<NodeKey> {
        self.bindings
            .get(expression)
            .copied()
            .filter(|k| self.nodes.contains_key(k))
    }

    /// Ask the view root for a unique id
    ///
    /// # Errors
    ///
    /// Returns `NotAnIdVendor` if the root has been replaced by a node that
    /// cannot vend ids.
    pub fn create_root_unique_id(&mut self, seed: Option<&str>) -> Result<String> {
        let root = self.root;
        let vendor = self
            .get_mut(root)?
            .as_id_vendor_mut()
            .ok_or(EngineError::NotAnIdVendor { key: root })?;
        Ok(vendor.create_unique_id(seed))
    }

    /// Client id: ids of enclosing naming containers and the node, joined
    /// with `:`
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `key` or one of its ancestors is missing.
    pub fn client_id(&self, key: NodeKey) -> Result<String> {
        let component = self.get(key)?;
        let mut parts = vec![component.id.clone().unwrap_or_default()];
        let mut current = component.parent;
        while let Some(parent_key) = current {
            let parent = self.get(parent_key)?;
            if parent.is_naming_container() {
                parts.push(parent.id.clone().unwrap_or_default());
            }
            current = parent.parent;
        }
        parts.reverse();
        Ok(parts.join(":"))
    }

    /// Depth-first search for a component by its rendered id
    pub fn find_by_id(&self, id: &str) -> Option<NodeKey> {
        self.descendants(self.root)
            .into_iter()
            .find(|k| self.nodes.get(k).and_then(|c| c.id.as_deref()) == Some(id))
    }

    /// Keys of `key` and all its descendants, pre-order, children before
    /// facets
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            if let Some(component) = self.nodes.get(&next) {
                out.push(next);
                stack.extend(component.facets.values().rev().copied());
                stack.extend(component.children.iter().rev().copied());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::{FORM_TYPE, INPUT_TEXT_TYPE, PANEL_TYPE};

    #[test]
    fn test_new_tree_has_view_root() {
        let tree = ComponentTree::new("/index.xhtml");
        assert_eq!(tree.len(), 1);
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.id.as_deref(), Some("/index.xhtml"));
        assert!(root.as_id_vendor().is_some());
    }

    #[test]
    fn test_remove_subtree_drops_descendants_and_unlinks() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let panel = tree.insert(PANEL_TYPE, ComponentKind::panel());
        let input = tree.insert(INPUT_TEXT_TYPE, ComponentKind::input());
        let header = tree.insert(PANEL_TYPE, ComponentKind::panel());
        tree.append_child(root, panel).unwrap();
        tree.append_child(panel, input).unwrap();
        tree.set_facet(panel, "header", header).unwrap();

        assert_eq!(tree.remove_subtree(panel), 3);
        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_root_is_never_removed() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        assert_eq!(tree.remove_subtree(root), 0);
        assert!(tree.contains(root));
    }

    #[test]
    fn test_client_id_includes_naming_containers_only() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let form = tree.insert(FORM_TYPE, ComponentKind::Form(VendorState::default()));
        let panel = tree.insert(PANEL_TYPE, ComponentKind::panel());
        let input = tree.insert(INPUT_TEXT_TYPE, ComponentKind::input());
        tree.get_mut(form).unwrap().id = Some("form".to_string());
        tree.get_mut(panel).unwrap().id = Some("box".to_string());
        tree.get_mut(input).unwrap().id = Some("name".to_string());
        tree.append_child(root, form).unwrap();
        tree.append_child(form, panel).unwrap();
        tree.append_child(panel, input).unwrap();

        assert_eq!(tree.client_id(input).unwrap(), "form:name");
        assert_eq!(tree.find_by_id("name"), Some(input));
    }

    #[test]
    fn test_binding_is_dropped_with_its_node() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let panel = tree.insert(PANEL_TYPE, ComponentKind::panel());
        tree.append_child(root, panel).unwrap();
        tree.bind("#{bean.panel}", panel).unwrap();

        assert_eq!(tree.bound("#{bean.panel}"), Some(panel));
        assert_eq!(
            tree.get(panel).unwrap().binding.as_deref(),
            Some("#{bean.panel}")
        );

        tree.remove_subtree(panel);
        assert_eq!(tree.bound("#{bean.panel}"), None);
    }

    #[test]
    fn test_get_missing_node_is_invalid_tree_state() {
        let tree = ComponentTree::new("v");
        let err = tree.get(NodeKey(42)).unwrap_err();
        assert!(matches!(err, EngineError::NodeNotFound { .. }));
    }
}
