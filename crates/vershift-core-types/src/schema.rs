//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";
pub const FIELD_SPAN_ID: &str = "span_id";

// Transformation identifiers
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_OPERATION: &str = "operation";
pub const FIELD_ATTRIBUTE: &str = "attribute";
pub const FIELD_TARGET_VERSION: &str = "target_version";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_DISCARDED: &str = "discarded";
