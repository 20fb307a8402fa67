//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use vershift_core::log_op_start;
/// log_op_start!("transform_resource");
/// log_op_start!("transform_resource", address = "/subsystem=web");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = vershift_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = vershift_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use vershift_core::log_op_end;
/// log_op_end!("transform_resource", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = vershift_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = vershift_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```ignore
/// # use vershift_core::{log_op_error, TransformError};
/// let err = TransformError::Internal { message: "boom".to_string() };
/// log_op_error!("transform_operation", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err: &$crate::errors::TransformError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = vershift_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_code = err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err: &$crate::errors::TransformError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = vershift_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_code = err.code(),
            $($field)*
        );
    }};
}
