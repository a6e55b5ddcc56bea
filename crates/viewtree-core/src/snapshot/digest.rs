//! Deterministic tree digests
//!
//! SHA256 over the canonical JSON rendering. Same tree, same digest;
//! any change to identity, ids, order, state or attributes changes it.

use sha2::{Digest, Sha256};

use super::canonical::canonical_tree;
use crate::errors::Result;
use crate::model::{ComponentTree, NodeKey};

/// Digest of the whole tree, view root included
///
/// ## Errors
///
/// Returns `Serialization` if the canonical rendering fails.
///
/// ## Example
///
/// ```
/// use viewtree_core::model::ComponentTree;
/// use viewtree_core::snapshot::compute_tree_digest;
///
/// let tree = ComponentTree::new("/index.xhtml");
/// let digest = compute_tree_digest(&tree).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn compute_tree_digest(tree: &ComponentTree) -> Result<String> {
    compute_subtree_digest(tree, tree.root())
}

/// Digest of the subtree rooted at `key`
///
/// # Errors
///
/// Returns `NodeNotFound` if `key` is not a live node.
pub fn compute_subtree_digest(tree: &ComponentTree, key: NodeKey) -> Result<String> {
    let canonical = serde_json::to_string(&canonical_tree(tree, key)?)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
