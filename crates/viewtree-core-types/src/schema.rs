//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields consistent between the driver, the
//! pruner and the CLI.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_BUILD_ID: &str = "build_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Tree identifiers
pub const FIELD_VIEW_ID: &str = "view_id";
pub const FIELD_TAG_ID: &str = "tag_id";
pub const FIELD_COMPONENT_ID: &str = "component_id";
pub const FIELD_FACET: &str = "facet";

// Build counters
pub const FIELD_CREATED: &str = "created";
pub const FIELD_REUSED: &str = "reused";
pub const FIELD_REMOVED: &str = "removed";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
