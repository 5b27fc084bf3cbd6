//! propx core - declarative property/model system
//!
//! This crate provides typed, validated, serializable attributes on model
//! classes:
//! - A composable property type algebra with defaults, `accepts` coercions,
//!   nullability, containers, unions, references and data specs
//! - Model classes whose property tables are merged along the class
//!   hierarchy, and instances with lazy defaults and change notification
//! - Serialization of model graphs into an id-referenced wire document
//! - An integrity validator running per-class checks over model graphs

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod property;
pub mod rules;
pub mod serialize;
pub mod settings;
pub mod value;

pub use propx_core_types as core_types;

// Re-export commonly used types
pub use core_types::ModelId;
pub use errors::{PropxError, PxError, PxErrorKind, Result, ValidationError};
pub use model::{ClassBuilder, HasProps, ModelClass, ModelRef};
pub use property::{props, PropertyType};
pub use rules::{Validator, ValidatorConfig};
pub use serialize::{serialize_graph, SerializedGraph};
pub use settings::Settings;
pub use value::Value;
