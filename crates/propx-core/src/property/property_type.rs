use super::dataspec::DataSpecKind;
use super::kind::Kind;
use crate::errors::{Result, ValidationError};
use crate::model::{ModelClass, ModelRef};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Conversion applied to a value matched by an `accepts` alternative
pub type Converter = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Deferred default, evaluated once per instance on first read
pub type DefaultFactory = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

/// Declared default of a property
#[derive(Clone)]
pub enum DefaultValue {
    /// No default: the property starts unset
    Undefined,
    Value(Value),
    Factory(DefaultFactory),
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Undefined => write!(f, "Undefined"),
            DefaultValue::Value(v) => write!(f, "Value({})", v),
            DefaultValue::Factory(_) => write!(f, "Factory"),
        }
    }
}

#[derive(Clone)]
struct Accepts {
    ty: PropertyType,
    convert: Converter,
}

/// Immutable validation and coercion rule for a property slot
///
/// A `PropertyType` pairs a [`Kind`] with the per-declaration options: the
/// default, help text, `accepts` coercions and the readonly/serialized flags.
/// It is built once when a class is declared and shared by every instance.
#[derive(Clone)]
pub struct PropertyType {
    kind: Kind,
    default: Option<DefaultValue>,
    help: Option<String>,
    accepts: Vec<Accepts>,
    serialized: bool,
    readonly: bool,
}

impl PropertyType {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            default: None,
            help: None,
            accepts: Vec::new(),
            serialized: true,
            readonly: false,
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    // ===== Builder =====

    /// Declare a literal default
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Declare a deferred default, evaluated separately for every instance
    pub fn with_default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Factory(Arc::new(factory)));
        self
    }

    /// Default to a fresh, default-constructed instance of `class` per model
    pub fn with_instance_default(self, class: &'static ModelClass) -> Self {
        self.with_default_factory(move || ModelRef::with_defaults(class).map(Value::Model))
    }

    pub(crate) fn with_default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Remove any default: the property starts unset and must be assigned
    pub fn required(mut self) -> Self {
        self.default = Some(DefaultValue::Undefined);
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Accept values of `ty` as well, converting them with `convert`
    ///
    /// Alternatives are tried in declaration order after the primary type
    /// fails. The converted value must satisfy the primary type.
    pub fn accepts<F>(mut self, ty: PropertyType, convert: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.accepts.push(Accepts {
            ty,
            convert: Arc::new(convert),
        });
        self
    }

    /// Writable only during construction or through the internal write path
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Exclude from serialized output
    pub fn not_serialized(mut self) -> Self {
        self.serialized = false;
        self
    }

    // ===== Queries =====

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_serialized(&self) -> bool {
        self.serialized
    }

    /// Whether null satisfies this type
    pub fn is_nullable(&self) -> bool {
        self.kind.check(&Value::Null).is_ok()
    }

    /// The declared default, or the kind's intrinsic one
    pub fn default(&self) -> DefaultValue {
        match &self.default {
            Some(default) => default.clone(),
            None => self
                .kind
                .intrinsic_default()
                .map_or(DefaultValue::Undefined, DefaultValue::Value),
        }
    }

    /// The default when it is a literal; `None` for factories and unset
    pub fn literal_default(&self) -> Option<Value> {
        match self.default() {
            DefaultValue::Value(v) => Some(v),
            DefaultValue::Undefined | DefaultValue::Factory(_) => None,
        }
    }

    /// Materialize the default, invoking a factory if one is declared
    ///
    /// # Errors
    ///
    /// Returns the factory's error when the deferred default fails to build.
    pub fn default_value(&self) -> Result<Option<Value>> {
        match self.default() {
            DefaultValue::Undefined => Ok(None),
            DefaultValue::Value(v) => Ok(Some(v)),
            DefaultValue::Factory(factory) => factory().map(Some),
        }
    }

    /// Human readable type description, e.g. `Nullable(Seq(Int))`
    pub fn describe(&self) -> String {
        self.kind.describe()
    }

    // ===== Validation =====

    /// Strict check of `value` against this type, with no coercion
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the mismatch.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), ValidationError> {
        self.kind.check(value)
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Turn an incoming value into the value to store
    ///
    /// Valid values pass through in their canonical form (see
    /// [`Kind::canonical`]). Otherwise nested coercions are attempted, then
    /// each `accepts` alternative in order.
    ///
    /// # Errors
    ///
    /// Returns the primary type's [`ValidationError`] when nothing matches.
    pub fn prepare_value(&self, value: Value) -> std::result::Result<Value, ValidationError> {
        if self.kind.check(&value).is_ok() {
            return Ok(self.kind.canonical(value));
        }
        let primary = match self.kind.coerce(value.clone()) {
            Ok(coerced) => return Ok(coerced),
            Err(err) => err,
        };
        for alt in &self.accepts {
            if let Ok(accepted) = alt.ty.prepare_value(value.clone()) {
                let converted = (alt.convert)(accepted);
                return match self.kind.check(&converted) {
                    Ok(()) => Ok(self.kind.canonical(converted)),
                    Err(err) => Err(err.with_detail(format!(
                        "value accepted as {} did not convert to a valid value",
                        alt.ty.describe()
                    ))),
                };
            }
        }
        Err(primary)
    }

    pub fn canonical(&self, value: Value) -> Value {
        self.kind.canonical(value)
    }

    /// The form of `value` written to the wire
    pub fn to_serializable(&self, value: &Value) -> Value {
        match &self.kind {
            Kind::DataSpec(spec) => spec.to_tagged(value),
            _ => value.clone(),
        }
    }

    pub(crate) fn dataspec(&self) -> Option<&DataSpecKind> {
        match &self.kind {
            Kind::DataSpec(spec) => Some(spec),
            _ => None,
        }
    }
}

impl fmt::Debug for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyType")
            .field("kind", &self.describe())
            .field("default", &self.default())
            .field("readonly", &self.readonly)
            .field("serialized", &self.serialized)
            .finish()
    }
}

impl From<Kind> for PropertyType {
    fn from(kind: Kind) -> Self {
        PropertyType::new(kind)
    }
}
