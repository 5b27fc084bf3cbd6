use thiserror::Error;

/// Result type alias using PropxError
pub type Result<T> = std::result::Result<T, PropxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PxErrorKind {
    // Value contract
    InvalidValue,
    UnsetValue,
    UnknownProperty,
    Readonly,

    // Declaration
    AbstractModel,
    InvalidDeclaration,

    // Notification
    Listener,

    // Integration
    Serialization,
    Config,

    // Internal
    Internal,
}

impl PxErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            PxErrorKind::InvalidValue => "ERR_INVALID_VALUE",
            PxErrorKind::UnsetValue => "ERR_UNSET_VALUE",
            PxErrorKind::UnknownProperty => "ERR_UNKNOWN_PROPERTY",
            PxErrorKind::Readonly => "ERR_READONLY",
            PxErrorKind::AbstractModel => "ERR_ABSTRACT_MODEL",
            PxErrorKind::InvalidDeclaration => "ERR_INVALID_DECLARATION",
            PxErrorKind::Listener => "ERR_LISTENER",
            PxErrorKind::Serialization => "ERR_SERIALIZATION",
            PxErrorKind::Config => "ERR_CONFIG",
            PxErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Structured representation of errors with classification fields for
/// programmatic handling and context for debugging.
#[derive(Debug, Clone)]
pub struct PxError {
    kind: PxErrorKind,
    op: Option<String>,
    model_class: Option<String>,
    property: Option<String>,
    message: String,
}

impl PxError {
    /// Create a new error with the specified kind
    pub fn new(kind: PxErrorKind) -> Self {
        Self {
            kind,
            op: None,
            model_class: None,
            property: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add model class context
    pub fn with_model_class(mut self, class: impl Into<String>) -> Self {
        self.model_class = Some(class.into());
        self
    }

    /// Add property context
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> PxErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the model class context, if any
    pub fn model_class(&self) -> Option<&str> {
        self.model_class.as_deref()
    }

    /// Get the property context, if any
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for PxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        match (&self.model_class, &self.property) {
            (Some(class), Some(property)) => write!(f, " ({}.{})", class, property)?,
            (Some(class), None) => write!(f, " ({})", class)?,
            (None, Some(property)) => write!(f, " (property: {})", property)?,
            (None, None) => {}
        }
        Ok(())
    }
}

impl std::error::Error for PxError {}

// ========== End Error Facility ==========

/// A value failed a property type's contract
///
/// Carries the expected type description together with the offending
/// value's type and representation. `detail` narrows down which part of a
/// composite value was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected a value of type {expected}, got {value_repr} of type {value_type}{}", .detail.as_ref().map(|d| format!(" ({d})")).unwrap_or_default())]
pub struct ValidationError {
    pub expected: String,
    pub value_type: String,
    pub value_repr: String,
    pub detail: Option<String>,
}

impl ValidationError {
    /// Create an error for `value` not matching the `expected` type description
    pub fn new(expected: impl Into<String>, value: &crate::value::Value) -> Self {
        Self {
            expected: expected.into(),
            value_type: value.type_name().to_string(),
            value_repr: value.to_string(),
            detail: None,
        }
    }

    /// Attach detail about the rejected part of the value
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Error taxonomy for property and model operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropxError {
    // ===== Value Errors =====
    /// A value assigned to a property failed its type contract
    #[error("{model}.{property}: {error}")]
    Validation {
        model: String,
        property: String,
        #[source]
        error: ValidationError,
    },

    /// A property without a default was read before being set
    #[error("{model}.{property} doesn't have a value set")]
    UnsetValue { model: String, property: String },

    /// Construction or assignment used a name the class does not declare
    #[error("unexpected attribute '{property}' to {model}, possible attributes are {}", .possible.join(", "))]
    UnknownProperty {
        model: String,
        property: String,
        possible: Vec<String>,
    },

    /// A readonly property was written after construction
    #[error("{model}.{property} is a readonly property")]
    ReadonlyProperty { model: String, property: String },

    // ===== Declaration Errors =====
    /// An abstract class or property bundle was instantiated
    #[error("cannot instantiate abstract model class {class}")]
    AbstractModel { class: String },

    /// A class declaration is inconsistent
    #[error("invalid declaration of {class}.{property}: {reason}")]
    InvalidDeclaration {
        class: String,
        property: String,
        reason: String,
    },

    // ===== Notification Errors =====
    /// A change listener failed; remaining listeners were not invoked
    #[error("change listener for '{property}' failed: {message}")]
    ListenerFailed { property: String, message: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Settings could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from PropxError to the structured facility error
impl From<PropxError> for PxError {
    fn from(err: PropxError) -> Self {
        match err {
            PropxError::Validation {
                model,
                property,
                error,
            } => PxError::new(PxErrorKind::InvalidValue)
                .with_model_class(model)
                .with_property(property)
                .with_message(error.to_string()),

            PropxError::UnsetValue { model, property } => PxError::new(PxErrorKind::UnsetValue)
                .with_model_class(model)
                .with_property(property)
                .with_message("Property doesn't have a value set"),

            PropxError::UnknownProperty {
                model, property, ..
            } => PxError::new(PxErrorKind::UnknownProperty)
                .with_model_class(model)
                .with_property(property)
                .with_message("Unknown property"),

            PropxError::ReadonlyProperty { model, property } => {
                PxError::new(PxErrorKind::Readonly)
                    .with_model_class(model)
                    .with_property(property)
                    .with_message("Property is readonly")
            }

            PropxError::AbstractModel { class } => PxError::new(PxErrorKind::AbstractModel)
                .with_model_class(class)
                .with_message("Abstract model classes cannot be instantiated"),

            PropxError::InvalidDeclaration {
                class,
                property,
                reason,
            } => PxError::new(PxErrorKind::InvalidDeclaration)
                .with_model_class(class)
                .with_property(property)
                .with_message(reason),

            PropxError::ListenerFailed { property, message } => {
                PxError::new(PxErrorKind::Listener)
                    .with_property(property)
                    .with_message(message)
            }

            PropxError::Serialization { message } => {
                PxError::new(PxErrorKind::Serialization).with_message(message)
            }

            PropxError::Config { message } => {
                PxError::new(PxErrorKind::Config).with_message(message)
            }

            PropxError::Internal { message } => {
                PxError::new(PxErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to PropxError
impl From<serde_json::Error> for PropxError {
    fn from(err: serde_json::Error) -> Self {
        PropxError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from config::ConfigError to PropxError
impl From<config::ConfigError> for PropxError {
    fn from(err: config::ConfigError) -> Self {
        PropxError::Config {
            message: err.to_string(),
        }
    }
}
