//! Canonical renderings of a component tree
//!
//! ## Responsibilities
//!
//! - Render a subtree as canonical JSON (stable key order, children in
//!   order, facets by name)
//! - Compute deterministic digests over that rendering
//! - Produce a human-readable outline
//!
//! Equal digests across two passes mean the second pass changed nothing
//! observable: no node was recreated, renamed, reordered or re-valued.

pub mod canonical;
pub mod digest;

pub use canonical::{canonical_tree, outline};
pub use digest::{compute_subtree_digest, compute_tree_digest};
