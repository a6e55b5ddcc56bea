//! Mark-and-sweep pruning of stale children
//!
//! Only nodes the engine created are ever marked. Children added by
//! application code carry no tag-id and survive every rebuild.

use crate::errors::Result;
use crate::model::{ComponentTree, NodeKey};

/// Mark the engine-created children and facet slots of `key` as pending
/// deletion
///
/// For an engine-synthesized wrapper slot its children are marked instead
/// of the wrapper; the wrapper is normalized by `sweep`. Not recursive.
///
/// # Errors
///
/// Returns `NodeNotFound` if `key` or one of its slots is missing.
pub fn mark_pending(tree: &mut ComponentTree, key: NodeKey) -> Result<()> {
    let component = tree.get(key)?;
    let mut marked: Vec<NodeKey> = component
        .children
        .iter()
        .copied()
        .filter(|k| is_engine_created(tree, *k))
        .collect();

    for slot in component.facets.values() {
        let slot_component = tree.get(*slot)?;
        if slot_component.facet_wrapper {
            marked.extend(
                slot_component
                    .children
                    .iter()
                    .copied()
                    .filter(|k| is_engine_created(tree, *k)),
            );
        } else if slot_component.is_engine_created() {
            marked.push(*slot);
        }
    }

    for k in marked {
        tree.get_mut(k)?.pending_deletion = true;
    }
    Ok(())
}

/// Clear the pending marker of a revisited node
///
/// # Errors
///
/// Returns `NodeNotFound` if `key` is not a live node.
pub fn clear_pending(tree: &mut ComponentTree, key: NodeKey) -> Result<()> {
    tree.get_mut(key)?.pending_deletion = false;
    Ok(())
}

/// Remove every child, facet slot and wrapped facet child of `key` still
/// marked pending, then normalize the wrappers
///
/// A wrapper left empty is removed with its slot. A wrapper left with a
/// single container-capable child is replaced by that child. Returns the
/// number of stale nodes dropped, descendants included; wrappers removed by
/// normalization are not counted.
///
/// # Errors
///
/// Returns `NodeNotFound` if `key` or one of its slots is missing.
pub fn sweep(tree: &mut ComponentTree, key: NodeKey) -> Result<usize> {
    let component = tree.get(key)?;
    let mut stale: Vec<NodeKey> = component
        .children
        .iter()
        .copied()
        .filter(|k| is_pending(tree, *k))
        .collect();
    let mut wrappers = Vec::new();
    for (name, slot) in &component.facets {
        let slot_component = tree.get(*slot)?;
        if slot_component.pending_deletion {
            stale.push(*slot);
        } else if slot_component.facet_wrapper {
            stale.extend(
                slot_component
                    .children
                    .iter()
                    .copied()
                    .filter(|k| is_pending(tree, *k)),
            );
            wrappers.push((name.clone(), *slot));
        }
    }

    let mut removed = 0;
    for k in stale {
        removed += tree.remove_subtree(k);
    }

    for (name, wrapper) in wrappers {
        normalize_wrapper(tree, key, &name, wrapper)?;
    }
    Ok(removed)
}

fn normalize_wrapper(tree: &mut ComponentTree, parent: NodeKey, name: &str, wrapper: NodeKey) -> Result<()> {
    let children = tree.children(wrapper).to_vec();
    match children.as_slice() {
        [] => {
            tree.remove_subtree(wrapper);
        }
        [only] if tree.get(*only)?.as_container().is_some() => {
            let only = *only;
            tree.get_mut(wrapper)?.children.clear();
            tree.set_facet(parent, name, only)?;
            tree.remove_subtree(wrapper);
        }
        _ => {}
    }
    Ok(())
}

fn is_engine_created(tree: &ComponentTree, key: NodeKey) -> bool {
    tree.get(key).map(|c| c.is_engine_created()).unwrap_or(false)
}

fn is_pending(tree: &ComponentTree, key: NodeKey) -> bool {
    tree.get(key).map(|c| c.pending_deletion).unwrap_or(false)
}
