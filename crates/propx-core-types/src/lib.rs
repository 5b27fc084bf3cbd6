//! Core types shared across propx facilities
//!
//! This crate provides foundational types used by the property system,
//! its error facility and its logging facility:
//!
//! - **Identity types**: ModelId, the opaque token a model is referenced by
//! - **Schema constants**: Canonical field keys and event names

pub mod identity;
pub mod schema;

pub use identity::ModelId;
