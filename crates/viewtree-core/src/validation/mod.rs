//! Default constraint injection
//!
//! The registry knows which validators exist and which ones every editable
//! component receives by default; the injector decides, per component and
//! per scope, which of those defaults actually get attached.

pub mod injector;
pub mod registry;

pub use injector::{add_default_validators, should_add_default_validator};
pub use registry::{ConstraintRegistry, StandardConstraintRegistry};
