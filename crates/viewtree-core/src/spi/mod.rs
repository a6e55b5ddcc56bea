//! Collaborator interfaces consumed by the driver
//!
//! Each trait has a default implementation good enough for tests and the
//! CLI; applications plug in their own through `Collaborators`.

pub mod binding;
pub mod factory;
pub mod hooks;

pub use binding::{AttributeBinder, DefaultAttributeBinder, ExpressionEvaluator, VariableEvaluator, Variables};
pub use factory::{NodeFactory, StandardNodeFactory};
pub use hooks::{ComponentHooks, NoopHooks};
