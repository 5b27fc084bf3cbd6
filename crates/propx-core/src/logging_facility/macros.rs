//! Operation logging macros
//!
//! An operation over a class table or a model graph logs a `start` event
//! and then exactly one `end` or `end_error` event. Closing events carry
//! `duration_ms`: pass `since = <Instant>` to have it measured, or
//! `duration_ms = <n>` when the caller already has it. Extra `key = value`
//! fields go after those, in `tracing` field syntax.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation at INFO
///
/// ```
/// # use propx_core::log_op_start;
/// log_op_start!("resolve_class", model_class = "Row");
/// log_op_start!("serialize_graph", root_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation at INFO
///
/// ```
/// # use propx_core::log_op_end;
/// let started = std::time::Instant::now();
/// log_op_end!("resolve_class", since = started, property_count = 12);
/// log_op_end!("check_integrity", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, since = $started:expr $(, $($field:tt)*)?) => {
        $crate::log_op_end!(
            $op,
            duration_ms = $started.elapsed().as_millis() as u64
            $(, $($field)*)?
        )
    };
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation at ERROR with the error's stable code and kind
///
/// `$err` is anything convertible into [`PxError`](crate::errors::PxError),
/// a [`PropxError`](crate::errors::PropxError) included.
///
/// ```
/// # use propx_core::{log_op_error, errors::PropxError};
/// let err = PropxError::InvalidDeclaration {
///     class: "Wedge".to_string(),
///     property: "radius_units".to_string(),
///     reason: "declared twice".to_string(),
/// };
/// log_op_error!("resolve_class", err, duration_ms = 0, model_class = "Wedge");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, since = $started:expr $(, $($field:tt)*)?) => {
        $crate::log_op_error!(
            $op,
            $err,
            duration_ms = $started.elapsed().as_millis() as u64
            $(, $($field)*)?
        )
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let px_err: $crate::errors::PxError = ($err).into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?px_err.kind(),
            err.code = px_err.code()
            $(, $($field)*)?
        )
    }};
}
