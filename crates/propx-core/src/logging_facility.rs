//! Structured logging for property and model operations
//!
//! Class table resolution, integrity checks and graph serialization are
//! bracketed by `start` and `end` events from
//! [`log_op_start!`](crate::log_op_start) and
//! [`log_op_end!`](crate::log_op_end); failures go through
//! [`log_op_error!`](crate::log_op_error) with the stable error code. Single
//! property writes log at DEBUG only, when a value or a listener fails.
//! Validation issues are `issue` events at WARN or ERROR carrying
//! `issue.code`, `issue.name` and `issue.extra`. Field names come from
//! [`schema`](crate::core_types::schema).
//!
//! ```rust
//! use propx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
