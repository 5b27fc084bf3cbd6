use crate::errors::{PropxError, Result};
use crate::property::{property_validation_enabled, PropertyType};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A property type bound to a name on a model class
#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    name: String,
    property: Arc<PropertyType>,
    owner: &'static str,
}

impl PropertyDescriptor {
    pub fn new(name: &str, property: PropertyType, owner: &'static str) -> Self {
        Self {
            name: name.to_string(),
            property: Arc::new(property),
            owner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> &PropertyType {
        &self.property
    }

    /// Name of the class that declared the property
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn is_readonly(&self) -> bool {
        self.property.is_readonly()
    }

    pub fn is_serialized(&self) -> bool {
        self.property.is_serialized()
    }

    /// Validate and coerce an incoming value for storage on `class`
    ///
    /// Skipped while property validation is disabled.
    pub(crate) fn prepare(&self, value: Value, class: &str) -> Result<Value> {
        if !property_validation_enabled() {
            return Ok(value);
        }
        self.property.prepare_value(value).map_err(|error| {
            tracing::debug!(
                component = module_path!(),
                op = "prepare_value",
                model_class = class,
                property = %self.name,
                error = %error,
                "rejected property value"
            );
            PropxError::Validation {
                model: class.to_string(),
                property: self.name.clone(),
                error,
            }
        })
    }

    /// Current value from `values`, caching a materialized default
    pub(crate) fn read(&self, values: &mut HashMap<String, Value>, model: &str) -> Result<Value> {
        if let Some(value) = values.get(&self.name) {
            return Ok(value.clone());
        }
        match self.property.default_value()? {
            Some(default) => {
                values.insert(self.name.clone(), default.clone());
                Ok(default)
            }
            None => Err(PropxError::UnsetValue {
                model: model.to_string(),
                property: self.name.clone(),
            }),
        }
    }
}

/// Resolved properties of a class, in declaration order
///
/// Aliases are alternative names for a property. Lookups follow them, but
/// they are not properties themselves: iteration, `names` and `len` skip
/// them.
#[derive(Clone, Debug, Default)]
pub struct PropertyTable {
    descriptors: Vec<PropertyDescriptor>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl PropertyTable {
    /// Add a descriptor, replacing one of the same name in place
    ///
    /// A property declared under an inherited alias's name replaces the alias.
    pub(crate) fn insert(&mut self, descriptor: PropertyDescriptor) {
        self.aliases.remove(descriptor.name());
        match self.index.get(descriptor.name()) {
            Some(&position) => self.descriptors[position] = descriptor,
            None => {
                self.index
                    .insert(descriptor.name().to_string(), self.descriptors.len());
                self.descriptors.push(descriptor);
            }
        }
    }

    pub(crate) fn insert_alias(&mut self, alias: &str, target: &str) {
        self.aliases.insert(alias.to_string(), target.to_string());
    }

    /// Descriptor for a property name or an alias of one
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Whether `name` is a property; aliases do not count
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The property an alias stands for
    pub fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.descriptors.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(PropertyDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
