//! Canonical logging macros

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use viewtree_core::log_op_start;
/// log_op_start!("build_view");
/// log_op_start!("build_view", view_id = "/index.xhtml");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use viewtree_core::log_op_end;
/// log_op_end!("build_view", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into an `ExError` so the event carries the
/// stable error code, plus the build, trace, tag and component ids the
/// error holds.
///
/// # Example
///
/// ```
/// # use viewtree_core::{log_op_error, errors::EngineError};
/// let err = EngineError::MissingParent { tag: "h:form".to_string() };
/// log_op_error!("build_view", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            build_id = ex_err.build_id().map(|id| id.as_str()),
            trace_id = ex_err.trace_id().map(|id| id.as_str()),
            tag_id = ex_err.tag_id(),
            component_id = ex_err.component_id()
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            build_id = ex_err.build_id().map(|id| id.as_str()),
            trace_id = ex_err.trace_id().map(|id| id.as_str()),
            tag_id = ex_err.tag_id(),
            component_id = ex_err.component_id(),
            $($field)*
        );
    }};
}
