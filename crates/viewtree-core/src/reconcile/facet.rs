//! Facet slot placement
//!
//! A facet slot holds exactly one node. When more than one component is
//! placed under the same facet name the engine synthesizes a wrapper panel
//! and marks it with `facet_wrapper`, so it can later be told apart from
//! panels authored in the template.

use crate::errors::Result;
use crate::model::component::PANEL_TYPE;
use crate::model::{ComponentKind, ComponentTree, NodeKey};

/// Place `child` into the facet `name` of `parent`
///
/// - empty slot: a container-capable child becomes the slot, anything else
///   is wrapped;
/// - slot is an engine wrapper: the child is appended to it;
/// - slot is any other node: a new wrapper takes the old slot value and the
///   child, in that order.
///
/// # Errors
///
/// Returns `NodeNotFound` if `parent` or `child` is missing; wrapper
/// creation fails with `NotAnIdVendor` if the view root cannot vend ids.
pub fn place_in_facet(tree: &mut ComponentTree, parent: NodeKey, name: &str, child: NodeKey) -> Result<()> {
    match tree.facet(parent, name) {
        None => {
            if tree.get(child)?.as_container().is_some() {
                tree.set_facet(parent, name, child)?;
            } else {
                let wrapper = create_wrapper(tree)?;
                tree.append_child(wrapper, child)?;
                tree.set_facet(parent, name, wrapper)?;
            }
        }
        Some(slot) if tree.get(slot)?.facet_wrapper => {
            tree.append_child(slot, child)?;
        }
        Some(slot) => {
            let wrapper = create_wrapper(tree)?;
            tree.append_child(wrapper, slot)?;
            tree.append_child(wrapper, child)?;
            tree.set_facet(parent, name, wrapper)?;
        }
    }
    Ok(())
}

/// Unlink `key` from wherever it sits under its parent: the child list,
/// a facet slot (the slot is dropped) or a wrapper's children
///
/// # Errors
///
/// Returns `NodeNotFound` if `key` is not a live node.
pub fn detach_from_parent(tree: &mut ComponentTree, key: NodeKey) -> Result<()> {
    let Some(parent) = tree.get(key)?.parent else {
        return Ok(());
    };
    if let Ok(p) = tree.get_mut(parent) {
        p.children.retain(|k| *k != key);
        p.facets.retain(|_, k| *k != key);
    }
    tree.get_mut(key)?.parent = None;
    Ok(())
}

fn create_wrapper(tree: &mut ComponentTree) -> Result<NodeKey> {
    let id = tree.create_root_unique_id(None)?;
    let wrapper = tree.insert(PANEL_TYPE, ComponentKind::panel());
    let component = tree.get_mut(wrapper)?;
    component.id = Some(id);
    component.facet_wrapper = true;
    tracing::debug!(facet_wrapper = %wrapper, "facet wrapper synthesized");
    Ok(wrapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::OUTPUT_TEXT_TYPE;
    use crate::model::capability::ValueState;

    fn output(tree: &mut ComponentTree) -> NodeKey {
        tree.insert(OUTPUT_TEXT_TYPE, ComponentKind::Output(ValueState::default()))
    }

    #[test]
    fn test_container_child_becomes_slot() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let panel = tree.insert(PANEL_TYPE, ComponentKind::panel());

        place_in_facet(&mut tree, root, "header", panel).unwrap();
        assert_eq!(tree.facet(root, "header"), Some(panel));
        assert!(!tree.get(panel).unwrap().facet_wrapper);
    }

    #[test]
    fn test_plain_child_is_wrapped() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let text = output(&mut tree);

        place_in_facet(&mut tree, root, "header", text).unwrap();
        let slot = tree.facet(root, "header").unwrap();
        let wrapper = tree.get(slot).unwrap();
        assert!(wrapper.facet_wrapper);
        assert_eq!(wrapper.id.as_deref(), Some("j_id0"));
        assert_eq!(wrapper.children, vec![text]);
        assert_eq!(tree.get(text).unwrap().parent, Some(slot));
    }

    #[test]
    fn test_second_child_escalates_to_one_wrapper() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let first = tree.insert(PANEL_TYPE, ComponentKind::panel());
        let second = output(&mut tree);
        let third = output(&mut tree);

        place_in_facet(&mut tree, root, "header", first).unwrap();
        place_in_facet(&mut tree, root, "header", second).unwrap();
        place_in_facet(&mut tree, root, "header", third).unwrap();

        let slot = tree.facet(root, "header").unwrap();
        assert!(tree.get(slot).unwrap().facet_wrapper);
        assert_eq!(tree.children(slot), &[first, second, third]);
        assert_eq!(tree.get(root).unwrap().facets.len(), 1);
    }

    #[test]
    fn test_detach_drops_facet_slot() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let panel = tree.insert(PANEL_TYPE, ComponentKind::panel());
        place_in_facet(&mut tree, root, "header", panel).unwrap();

        detach_from_parent(&mut tree, panel).unwrap();
        assert_eq!(tree.facet(root, "header"), None);
        assert_eq!(tree.get(panel).unwrap().parent, None);
        assert!(tree.contains(panel));
    }

    #[test]
    fn test_detach_from_child_list() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let a = output(&mut tree);
        let b = output(&mut tree);
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();

        detach_from_parent(&mut tree, a).unwrap();
        assert_eq!(tree.children(root), &[b]);
    }
}
