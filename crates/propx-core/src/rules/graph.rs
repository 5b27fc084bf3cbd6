//! Model graph discovery

use crate::model::ModelRef;
use propx_core_types::ModelId;
use std::collections::{HashSet, VecDeque};

/// Every model reachable from `roots`, each once, in breadth-first order
///
/// Cycles are tolerated. A model whose references cannot be read (a
/// failing deferred default) is kept but not expanded.
pub fn collect_models(roots: &[ModelRef]) -> Vec<ModelRef> {
    let mut seen: HashSet<ModelId> = HashSet::new();
    let mut queue: VecDeque<ModelRef> = roots.iter().cloned().collect();
    let mut out = Vec::new();

    while let Some(model) = queue.pop_front() {
        if !seen.insert(model.id().clone()) {
            continue;
        }
        match model.references() {
            Ok(references) => queue.extend(references),
            Err(err) => tracing::debug!(
                component = module_path!(),
                op = "collect_models",
                model_id = %model.id(),
                error = %err,
                "skipping references of model"
            ),
        }
        out.push(model);
    }
    out
}
