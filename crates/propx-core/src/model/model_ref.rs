//! Shared model handles

use super::class::ModelClass;
use super::has_props::HasProps;
use super::listener::{dispatch, ChangeListener};
use crate::errors::{PxError, Result};
use crate::value::Value;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use propx_core_types::ModelId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct ModelCell {
    id: ModelId,
    class: &'static ModelClass,
    state: RwLock<HasProps>,
}

/// Cloneable, thread-safe handle to a model instance
///
/// This is the value stored in `Instance` properties. Two handles are equal
/// only if they point at the same instance. Each call takes the instance
/// lock for its own duration; listeners run after the lock is released.
#[derive(Clone)]
pub struct ModelRef(Arc<ModelCell>);

impl ModelRef {
    /// # Errors
    ///
    /// Same as [`HasProps::new`].
    pub fn new<I, K>(class: &'static ModelClass, kwargs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        HasProps::new(class, kwargs).map(Self::from_props)
    }

    /// # Errors
    ///
    /// Same as [`HasProps::new`].
    pub fn with_defaults(class: &'static ModelClass) -> Result<Self> {
        HasProps::with_defaults(class).map(Self::from_props)
    }

    pub fn from_props(props: HasProps) -> Self {
        Self(Arc::new(ModelCell {
            id: props.id().clone(),
            class: props.class(),
            state: RwLock::new(props),
        }))
    }

    pub fn id(&self) -> &ModelId {
        &self.0.id
    }

    pub fn class(&self) -> &'static ModelClass {
        self.0.class
    }

    pub fn is_instance_of(&self, class: &ModelClass) -> bool {
        self.0.class.is_subclass_of(class)
    }

    pub fn ptr_eq(&self, other: &ModelRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, HasProps> {
        self.0.state.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, HasProps> {
        self.0.state.write()
    }

    /// # Errors
    ///
    /// Same as [`HasProps::get`].
    pub fn get(&self, name: &str) -> Result<Value> {
        self.write().get(name)
    }

    /// # Errors
    ///
    /// Same as [`HasProps::set`].
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.assign_and_notify(name, value.into(), false)
    }

    /// # Errors
    ///
    /// Same as [`HasProps::set_internal`].
    pub fn set_internal(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.assign_and_notify(name, value.into(), true)
    }

    /// Apply a property value patch coming back from the rendering runtime
    ///
    /// The JSON is decoded with the wire encodings and written through the
    /// internal path, so readonly properties accept it.
    ///
    /// # Errors
    ///
    /// Same as [`HasProps::set_internal`].
    pub fn apply_json(&self, name: &str, json: &serde_json::Value) -> Result<()> {
        self.set_internal(name, Value::from_json(json))
    }

    fn assign_and_notify(&self, name: &str, value: Value, internal: bool) -> Result<()> {
        let (change, listeners) = {
            let mut state = self.write();
            let change = state.assign(name, value, internal)?;
            (change, state.listeners())
        };
        match change {
            Some(change) => dispatch(&listeners, &change),
            None => Ok(()),
        }
    }

    /// Register a closure listener
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&str, Option<&Value>, &Value) -> std::result::Result<(), PxError>
            + Send
            + Sync
            + 'static,
    {
        self.write().on_change(listener);
    }

    pub fn add_listener(&self, listener: Arc<dyn ChangeListener>) {
        self.write().add_listener(listener);
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.read().is_set(name)
    }

    /// # Errors
    ///
    /// Same as [`HasProps::properties_with_values`].
    pub fn properties_with_values(&self, include_defaults: bool) -> Result<Vec<(String, Value)>> {
        self.write().properties_with_values(include_defaults)
    }

    /// # Errors
    ///
    /// Same as [`HasProps::references`].
    pub fn references(&self) -> Result<Vec<ModelRef>> {
        self.write().references()
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ModelRef {}

impl Hash for ModelRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(id='{}')", self.0.class.name(), self.0.id)
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelRef({})", self)
    }
}
