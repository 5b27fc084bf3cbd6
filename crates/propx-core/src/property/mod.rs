//! Property type algebra
//!
//! - [`PropertyType`]: a [`Kind`] plus default, help, `accepts` coercions
//!   and readonly/serialized flags
//! - [`props`]: constructors for every kind, including the data specs
//! - [`validation`]: the property validation toggle

pub mod color;
pub mod dataspec;
pub mod kind;
pub mod property_type;
pub mod props;
pub(crate) mod temporal;
pub mod validation;

pub use dataspec::{DataSpecKind, Shorthand, Units};
pub use kind::{Kind, StructField};
pub use property_type::{Converter, DefaultFactory, DefaultValue, PropertyType};
pub use validation::{
    property_validation_enabled, set_property_validation, validate, without_property_validation,
    ValidationGuard,
};
