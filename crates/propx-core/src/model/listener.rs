//! Change notification sink

use crate::errors::{PropxError, PxError, Result};
use crate::value::Value;
use std::sync::Arc;

/// Receives `(property, old, new)` after a write changed a property
///
/// `old` is `None` when the property had no value before the write.
/// Returning an error aborts the remaining listeners and fails the write
/// with `ListenerFailed`; the new value stays stored.
pub trait ChangeListener: Send + Sync {
    /// # Errors
    ///
    /// Any error aborts dispatch to the listeners registered after this one.
    fn on_change(
        &self,
        property: &str,
        old: Option<&Value>,
        new: &Value,
    ) -> std::result::Result<(), PxError>;
}

impl<F> ChangeListener for F
where
    F: Fn(&str, Option<&Value>, &Value) -> std::result::Result<(), PxError> + Send + Sync,
{
    fn on_change(
        &self,
        property: &str,
        old: Option<&Value>,
        new: &Value,
    ) -> std::result::Result<(), PxError> {
        self(property, old, new)
    }
}

/// A committed change to one property
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub property: String,
    pub old: Option<Value>,
    pub new: Value,
}

/// Invoke `listeners` in registration order, stopping at the first failure
pub(crate) fn dispatch(listeners: &[Arc<dyn ChangeListener>], change: &Change) -> Result<()> {
    for listener in listeners {
        listener
            .on_change(&change.property, change.old.as_ref(), &change.new)
            .map_err(|err| {
                tracing::debug!(
                    component = module_path!(),
                    op = "dispatch_change",
                    property = %change.property,
                    err.code = err.code(),
                    "change listener failed"
                );
                PropxError::ListenerFailed {
                    property: change.property.clone(),
                    message: err.to_string(),
                }
            })?;
    }
    Ok(())
}
