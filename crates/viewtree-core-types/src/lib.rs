//! Core types shared across viewtree facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities of the engine:
//!
//! - **Correlation types**: BuildId, TraceId, BuildCorrelation
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{BuildCorrelation, BuildId, TraceId};
