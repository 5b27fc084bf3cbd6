//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_MODEL_ID: &str = "model_id";
pub const FIELD_MODEL_CLASS: &str = "model_class";
pub const FIELD_PROPERTY: &str = "property";

// Collection sizes
pub const FIELD_MODEL_COUNT: &str = "model_count";
pub const FIELD_PROPERTY_COUNT: &str = "property_count";
pub const FIELD_ERROR_COUNT: &str = "error_count";
pub const FIELD_WARNING_COUNT: &str = "warning_count";

// Validation issue fields
pub const FIELD_ISSUE_CODE: &str = "issue.code";
pub const FIELD_ISSUE_NAME: &str = "issue.name";
pub const FIELD_ISSUE_EXTRA: &str = "issue.extra";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ISSUE: &str = "issue";
