//! Property validation toggle
//!
//! Type validation on property writes can be switched off process-wide or,
//! with a guard, for a scope on the current thread. While disabled, writes
//! store the raw value. The integrity [`Validator`](crate::rules::Validator)
//! is not affected.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

static PROCESS_DEFAULT: AtomicBool = AtomicBool::new(true);

thread_local! {
    static THREAD_OVERRIDE: Cell<Option<bool>> = const { Cell::new(None) };
}

/// Whether property writes are currently validated on this thread
pub fn property_validation_enabled() -> bool {
    THREAD_OVERRIDE
        .with(Cell::get)
        .unwrap_or_else(|| PROCESS_DEFAULT.load(Ordering::Relaxed))
}

/// Set the process-wide default
pub fn set_property_validation(enabled: bool) {
    PROCESS_DEFAULT.store(enabled, Ordering::Relaxed);
}

/// Restores the previous thread setting when dropped
#[must_use = "validation is restored as soon as the guard is dropped"]
pub struct ValidationGuard {
    previous: Option<bool>,
}

impl Drop for ValidationGuard {
    fn drop(&mut self) {
        THREAD_OVERRIDE.with(|cell| cell.set(self.previous));
    }
}

/// Override property validation on this thread until the guard drops
pub fn validate(enabled: bool) -> ValidationGuard {
    let previous = THREAD_OVERRIDE.with(|cell| cell.replace(Some(enabled)));
    ValidationGuard { previous }
}

/// Run `f` with property validation disabled on this thread
pub fn without_property_validation<T>(f: impl FnOnce() -> T) -> T {
    let _guard = validate(false);
    f()
}
