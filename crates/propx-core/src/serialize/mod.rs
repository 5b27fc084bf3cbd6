//! Serialization of models into the wire document
//!
//! Nested models never appear inline: a [`ReferenceResolver`] turns each one
//! into an opaque `{"id": ..}` token. [`serialize_graph`] uses a
//! [`ReferenceCollector`] to emit every reachable model exactly once.

pub mod codec;

use crate::core_types::ModelId;
use crate::errors::Result;
use crate::model::ModelRef;
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

pub use codec::{decode, encode};

/// Registry interface: maps a model to its reference token
pub trait ReferenceResolver {
    fn reference(&mut self, model: &ModelRef) -> JsonValue;
}

/// Resolver that queues every model it has not seen before
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    seen: HashSet<ModelId>,
    pending: VecDeque<ModelRef>,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next queued model still to be serialized
    pub fn next_pending(&mut self) -> Option<ModelRef> {
        self.pending.pop_front()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl ReferenceResolver for ReferenceCollector {
    fn reference(&mut self, model: &ModelRef) -> JsonValue {
        if self.seen.insert(model.id().clone()) {
            self.pending.push_back(model.clone());
        }
        json!({"id": model.id()})
    }
}

/// Wire representation of one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRep {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub id: ModelId,
    pub attributes: Map<String, JsonValue>,
}

/// Roots plus every model reachable from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedGraph {
    pub roots: Vec<JsonValue>,
    pub references: Vec<ModelRep>,
}

impl SerializedGraph {
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }

    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, id: &ModelId) -> Option<&ModelRep> {
        self.references.iter().find(|rep| &rep.id == id)
    }
}

/// Serialize one model's attributes in property table order
///
/// Not-serialized properties are skipped, data specs are written in tagged
/// form, and unless `include_defaults` is set only explicitly set
/// properties appear.
///
/// # Errors
///
/// Returns an error when a deferred default fails to build.
pub fn serialize_model(
    model: &ModelRef,
    resolver: &mut dyn ReferenceResolver,
    include_defaults: bool,
) -> Result<ModelRep> {
    let values = model.properties_with_values(include_defaults)?;
    let table = model.class().properties()?;

    let mut attributes = Map::new();
    for (name, value) in values {
        let Some(descriptor) = table.get(&name) else {
            continue;
        };
        if !descriptor.is_serialized() {
            continue;
        }
        let wire = descriptor.property_type().to_serializable(&value);
        attributes.insert(name, encode(&wire, resolver));
    }

    Ok(ModelRep {
        kind: "object",
        name: model.class().name(),
        id: model.id().clone(),
        attributes,
    })
}

/// Serialize every model reachable from `roots`, each exactly once
///
/// # Errors
///
/// Returns the first model serialization error.
pub fn serialize_graph(roots: &[ModelRef], include_defaults: bool) -> Result<SerializedGraph> {
    let start = Instant::now();
    log_op_start!("serialize_graph", root_count = roots.len());

    let mut collector = ReferenceCollector::new();
    let root_refs: Vec<JsonValue> = roots.iter().map(|root| collector.reference(root)).collect();

    let mut references = Vec::new();
    while let Some(model) = collector.next_pending() {
        match serialize_model(&model, &mut collector, include_defaults) {
            Ok(rep) => references.push(rep),
            Err(err) => {
                log_op_error!(
                    "serialize_graph",
                    err.clone(),
                    since = start
                );
                return Err(err);
            }
        }
    }

    log_op_end!(
        "serialize_graph",
        since = start,
        model_count = references.len()
    );
    Ok(SerializedGraph {
        roots: root_refs,
        references,
    })
}
