//! Vectorized properties
//!
//! A data spec holds either a literal of its value type or a tagged
//! reference: `{value: v}`, `{field: name}` or `{expr: model}`, each with an
//! optional `transform: model`. Bare strings are shorthand, resolved by the
//! spec's [`Shorthand`] mode. On the wire only the tagged form appears.

use super::property_type::PropertyType;
use super::props;
use crate::errors::ValidationError;
use crate::model::ModelRef;
use crate::value::Value;

pub const VALUE: &str = "value";
pub const FIELD: &str = "field";
pub const EXPR: &str = "expr";
pub const TRANSFORM: &str = "transform";

/// How a bare string assigned to a data spec is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shorthand {
    /// A string the value type accepts is a literal, any other is a field name
    LiteralFirst,
    /// Every bare string is a field name
    FieldFirst,
}

/// Unit set of a spec; declares a companion `<name>_units` property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Units {
    allowed: &'static [&'static str],
    default: &'static str,
}

pub const ANGLE_UNITS: Units = Units::new(&["rad", "deg", "grad", "turn"], "rad");
pub const DISTANCE_UNITS: Units = Units::new(&["data", "screen"], "data");
pub const SIZE_UNITS: Units = Units::new(&["screen", "data"], "screen");

impl Units {
    pub const fn new(allowed: &'static [&'static str], default: &'static str) -> Self {
        Self { allowed, default }
    }

    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }

    pub fn default_unit(&self) -> &'static str {
        self.default
    }

    /// Type of the companion units property
    pub fn property_type(&self) -> PropertyType {
        props::enumeration(self.allowed.iter().copied()).with_default(self.default)
    }
}

#[derive(Clone)]
pub struct DataSpecKind {
    name: &'static str,
    value_type: Box<PropertyType>,
    shorthand: Shorthand,
    units: Option<Units>,
}

enum Form<'a> {
    Tagged(&'a [(Value, Value)]),
    Field(&'a str),
    Literal,
}

impl DataSpecKind {
    pub fn new(name: &'static str, value_type: PropertyType, shorthand: Shorthand) -> Self {
        Self {
            name,
            value_type: Box::new(value_type),
            shorthand,
            units: None,
        }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value_type(&self) -> &PropertyType {
        &self.value_type
    }

    pub fn shorthand(&self) -> Shorthand {
        self.shorthand
    }

    pub fn units(&self) -> Option<&Units> {
        self.units.as_ref()
    }

    pub fn describe(&self) -> String {
        format!("{}({})", self.name, self.value_type.describe())
    }

    fn classify<'a>(&self, value: &'a Value) -> Form<'a> {
        match value {
            Value::Dict(pairs) if is_tagged(pairs) => Form::Tagged(pairs),
            Value::String(s) => match self.shorthand {
                Shorthand::FieldFirst => Form::Field(s),
                Shorthand::LiteralFirst if self.value_type.is_valid(value) => Form::Literal,
                Shorthand::LiteralFirst => Form::Field(s),
            },
            _ => Form::Literal,
        }
    }

    fn mismatch(&self, value: &Value, detail: impl Into<String>) -> ValidationError {
        ValidationError::new(self.describe(), value).with_detail(detail)
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] when neither a valid literal nor a
    /// well-formed tagged reference is given.
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        match self.classify(value) {
            Form::Field(_) => Ok(()),
            Form::Literal => self
                .value_type
                .validate(value)
                .map_err(|e| self.mismatch(value, e.to_string())),
            Form::Tagged(pairs) => {
                for (k, v) in pairs {
                    match k.as_str() {
                        Some(VALUE) => self
                            .value_type
                            .validate(v)
                            .map_err(|e| self.mismatch(value, e.to_string()))?,
                        Some(FIELD) if v.as_str().is_none() => {
                            return Err(self.mismatch(value, "field name must be a string"));
                        }
                        Some(key @ (EXPR | TRANSFORM)) if v.as_model().is_none() => {
                            return Err(self.mismatch(value, format!("{} must be a model", key)));
                        }
                        _ => {}
                    }
                }
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the literal or the tagged `value`
    /// cannot be prepared by the value type.
    pub fn coerce(&self, value: Value) -> Result<Value, ValidationError> {
        match self.classify(&value) {
            Form::Field(_) => Ok(value),
            Form::Literal => self
                .value_type
                .prepare_value(value.clone())
                .map_err(|e| self.mismatch(&value, e.to_string())),
            Form::Tagged(pairs) => {
                let mut out = Vec::with_capacity(pairs.len());
                for (k, v) in pairs {
                    let prepared = if k.as_str() == Some(VALUE) {
                        self.value_type
                            .prepare_value(v.clone())
                            .map_err(|e| self.mismatch(&value, e.to_string()))?
                    } else {
                        v.clone()
                    };
                    out.push((k.clone(), prepared));
                }
                let coerced = Value::Dict(out);
                self.check(&coerced)?;
                Ok(coerced)
            }
        }
    }

    /// Canonical form of the literal or of the tagged `value`
    pub fn canonical(&self, value: Value) -> Value {
        match self.classify(&value) {
            Form::Field(_) => value,
            Form::Literal => self.value_type.canonical(value),
            Form::Tagged(pairs) => Value::Dict(
                pairs
                    .iter()
                    .map(|(k, v)| match k.as_str() {
                        Some(VALUE) => (k.clone(), self.value_type.canonical(v.clone())),
                        _ => (k.clone(), v.clone()),
                    })
                    .collect(),
            ),
        }
    }

    /// The tagged wire form of a stored value
    pub fn to_tagged(&self, v: &Value) -> Value {
        match self.classify(v) {
            Form::Tagged(_) => v.clone(),
            Form::Field(name) => field(name),
            Form::Literal => value(v.clone()),
        }
    }
}

fn is_tagged(pairs: &[(Value, Value)]) -> bool {
    let mut forms = 0;
    for (k, _) in pairs {
        match k.as_str() {
            Some(VALUE | FIELD | EXPR) => forms += 1,
            Some(TRANSFORM) => {}
            _ => return false,
        }
    }
    forms == 1
}

/// Tagged literal `{value: v}`
pub fn value(v: impl Into<Value>) -> Value {
    Value::Dict(vec![(Value::from(VALUE), v.into())])
}

/// Tagged column reference `{field: name}`
pub fn field(name: &str) -> Value {
    Value::Dict(vec![(Value::from(FIELD), Value::from(name))])
}

/// Tagged expression reference `{expr: model}`
pub fn expr(model: &ModelRef) -> Value {
    Value::Dict(vec![(Value::from(EXPR), Value::from(model))])
}

/// Attach a transform model to a tagged spec value
pub fn with_transform(spec: Value, transform: &ModelRef) -> Value {
    match spec {
        Value::Dict(mut pairs) => {
            pairs.retain(|(k, _)| k.as_str() != Some(TRANSFORM));
            pairs.push((Value::from(TRANSFORM), Value::from(transform)));
            Value::Dict(pairs)
        }
        other => other,
    }
}
