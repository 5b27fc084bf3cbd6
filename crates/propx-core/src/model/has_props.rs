//! Instance state of a model

use super::class::ModelClass;
use super::descriptor::{PropertyDescriptor, PropertyTable};
use super::listener::{dispatch, Change, ChangeListener};
use super::model_ref::ModelRef;
use crate::errors::{PropxError, PxError, Result};
use crate::value::Value;
use propx_core_types::ModelId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Property values of one model instance
///
/// Values are populated lazily: a property never written reads as its
/// default, which is then cached. Every write is validated and coerced by
/// the property's type before it is stored.
pub struct HasProps {
    id: ModelId,
    class: &'static ModelClass,
    values: HashMap<String, Value>,
    explicit: HashSet<String>,
    listeners: Vec<Arc<dyn ChangeListener>>,
}

fn unknown_property(class: &ModelClass, table: &PropertyTable, name: &str) -> PropxError {
    let mut possible: Vec<String> = table.names().into_iter().map(str::to_string).collect();
    possible.sort();
    PropxError::UnknownProperty {
        model: class.name().to_string(),
        property: name.to_string(),
        possible,
    }
}

impl HasProps {
    /// Construct an instance from keyword values
    ///
    /// Every keyword is validated before any is stored; readonly properties
    /// may be given here.
    ///
    /// # Errors
    ///
    /// - `AbstractModel` for abstract classes and bundles
    /// - `UnknownProperty` for a name the class does not declare
    /// - `Validation` for a value its property rejects
    /// - `InvalidDeclaration` when the class fails to resolve
    pub fn new<I, K>(class: &'static ModelClass, kwargs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        if class.is_abstract() {
            return Err(PropxError::AbstractModel {
                class: class.name().to_string(),
            });
        }
        let table = class.properties()?;

        let mut values = HashMap::new();
        let mut explicit = HashSet::new();
        for (name, value) in kwargs {
            let name = name.into();
            let descriptor = table
                .get(&name)
                .ok_or_else(|| unknown_property(class, table, &name))?;
            let prepared = descriptor.prepare(value, class.name())?;
            explicit.insert(descriptor.name().to_string());
            values.insert(descriptor.name().to_string(), prepared);
        }

        Ok(Self {
            id: ModelId::new(),
            class,
            values,
            explicit,
            listeners: Vec::new(),
        })
    }

    /// Construct an instance with every property at its default
    ///
    /// # Errors
    ///
    /// Same as [`HasProps::new`].
    pub fn with_defaults(class: &'static ModelClass) -> Result<Self> {
        Self::new(class, Vec::<(String, Value)>::new())
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn class(&self) -> &'static ModelClass {
        self.class
    }

    /// # Errors
    ///
    /// Returns `InvalidDeclaration` when the class fails to resolve.
    pub fn properties(&self) -> Result<&'static PropertyTable> {
        self.class.properties()
    }

    fn descriptor(&self, name: &str) -> Result<&'static PropertyDescriptor> {
        let table = self.class.properties()?;
        table
            .get(name)
            .ok_or_else(|| unknown_property(self.class, table, name))
    }

    /// Read a property, materializing its default on first access
    ///
    /// # Errors
    ///
    /// - `UnknownProperty` for an undeclared name
    /// - `UnsetValue` for a property without a default that was never set
    pub fn get(&mut self, name: &str) -> Result<Value> {
        let descriptor = self.descriptor(name)?;
        let model = self.to_string();
        descriptor.read(&mut self.values, &model)
    }

    /// Write a property and notify listeners when the value changed
    ///
    /// # Errors
    ///
    /// - `UnknownProperty`, `ReadonlyProperty` or `Validation` when the write
    ///   is rejected; the stored value is unchanged
    /// - `ListenerFailed` when a listener fails; the new value stays stored
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if let Some(change) = self.assign(name, value.into(), false)? {
            dispatch(&self.listeners, &change)?;
        }
        Ok(())
    }

    /// Write a property from the internal path, bypassing readonly
    ///
    /// # Errors
    ///
    /// Same as [`HasProps::set`] apart from `ReadonlyProperty`.
    pub fn set_internal(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if let Some(change) = self.assign(name, value.into(), true)? {
            dispatch(&self.listeners, &change)?;
        }
        Ok(())
    }

    /// Store a prepared value; returns the change if the value differs
    ///
    /// An alias is stored and reported under the property it stands for.
    pub(crate) fn assign(
        &mut self,
        name: &str,
        value: Value,
        internal: bool,
    ) -> Result<Option<Change>> {
        let descriptor = self.descriptor(name)?;
        let name = descriptor.name();
        if descriptor.is_readonly() && !internal {
            return Err(PropxError::ReadonlyProperty {
                model: self.class.name().to_string(),
                property: name.to_string(),
            });
        }
        let new = descriptor.prepare(value, self.class.name())?;
        let model = self.to_string();
        let old = match descriptor.read(&mut self.values, &model) {
            Ok(old) => Some(old),
            Err(PropxError::UnsetValue { .. }) => None,
            Err(err) => return Err(err),
        };

        self.values.insert(name.to_string(), new.clone());
        self.explicit.insert(name.to_string());

        if old.as_ref() == Some(&new) {
            return Ok(None);
        }
        Ok(Some(Change {
            property: name.to_string(),
            old,
            new,
        }))
    }

    /// Whether the property was given a value rather than left at its default
    pub fn is_set(&self, name: &str) -> bool {
        let name = match self.class.properties() {
            Ok(table) => table.alias_target(name).unwrap_or(name),
            Err(_) => name,
        };
        self.explicit.contains(name)
    }

    /// Register a closure listener
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: Fn(&str, Option<&Value>, &Value) -> std::result::Result<(), PxError>
            + Send
            + Sync
            + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub(crate) fn listeners(&self) -> Vec<Arc<dyn ChangeListener>> {
        self.listeners.clone()
    }

    /// Property values in table order
    ///
    /// With `include_defaults` every property that has a value is listed,
    /// materializing defaults; otherwise only explicitly set ones. Required
    /// properties that were never set are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when a deferred default fails to build.
    pub fn properties_with_values(&mut self, include_defaults: bool) -> Result<Vec<(String, Value)>> {
        let table = self.class.properties()?;
        let model = self.to_string();
        let mut out = Vec::new();
        for descriptor in table.iter() {
            if !include_defaults && !self.explicit.contains(descriptor.name()) {
                continue;
            }
            match descriptor.read(&mut self.values, &model) {
                Ok(value) => out.push((descriptor.name().to_string(), value)),
                Err(PropxError::UnsetValue { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(out)
    }

    /// Models referenced directly from this instance's property values
    ///
    /// # Errors
    ///
    /// Returns an error when a deferred default fails to build.
    pub fn references(&mut self) -> Result<Vec<ModelRef>> {
        let mut out = Vec::new();
        for (_, value) in self.properties_with_values(true)? {
            value.collect_models(&mut out);
        }
        Ok(out)
    }
}

impl fmt::Display for HasProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(id='{}')", self.class.name(), self.id)
    }
}

impl fmt::Debug for HasProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasProps")
            .field("class", &self.class.name())
            .field("id", &self.id)
            .field("explicit", &self.explicit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
