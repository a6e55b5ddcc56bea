//! viewtree core - template-to-component tree reconciliation
//!
//! This crate turns a compiled template (tags, attributes, nested children,
//! named facets) into a live component tree and keeps that tree
//! identity-stable across rebuilds:
//! - Identity resolution by structural tag-id and unique-id vendors
//! - Mark-and-sweep pruning of components a pass no longer produces
//! - Facet slot normalization with synthesized wrapper panels
//! - Default validator injection with exclusion and group scoping
//! - Validator and behavior tags, params, client ids
//! - Canonical tree digests for idempotency checks
//!
//! ```
//! use viewtree_core::model::{ComponentTag, Template, View};
//! use viewtree_core::{build_view, Collaborators, EngineConfig};
//!
//! let template = Template::new(
//!     "/index.xhtml",
//!     vec![ComponentTag::new("h:form", "jakarta.faces.HtmlForm")
//!         .with_id("form")
//!         .with_child(ComponentTag::new("h:inputText", "jakarta.faces.HtmlInputText").into())
//!         .into()],
//! )
//! .unwrap();
//!
//! let config = EngineConfig::default();
//! let collaborators = Collaborators::standard(&config);
//! let mut view = View::new("/index.xhtml");
//! build_view(&mut view, &template, &collaborators, &config).unwrap();
//!
//! let input = view.tree().find_by_id("j_idt2").unwrap();
//! assert_eq!(view.tree().client_id(input).unwrap(), "form:j_idt2");
//! ```

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod reconcile;
pub mod snapshot;
pub mod spi;
pub mod validation;

pub use viewtree_core_types as core_types;

// Re-export commonly used types
pub use config::{EngineConfig, ProjectStage};
pub use errors::{EngineError, ExError, ExErrorKind, Result};
pub use model::{Component, ComponentKind, ComponentTree, NodeKey, Template, TemplateNode, View};
pub use reconcile::{build_view, build_view_with_correlation, reconcile, BuildReport, Collaborators};
pub use snapshot::compute_tree_digest;
