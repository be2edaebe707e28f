//! Rules-map reconciliation: computes the next persisted adjacency map for
//! a proposed rewire, restoring the single-upstream invariant for the
//! rewired node before the new edge is merged in. The output is handed to
//! the external API client to PUT; nothing here performs I/O.

use crate::properties::{NodeId, NodeUpdate, Pipeline, Rules};

/// Remove `downstream_id` from every downstream list it currently appears
/// in, returning an otherwise equivalent map.
///
/// All occurrences are removed, not just the first: a map where the id
/// appears under several keys is a state the invariant should prevent, but
/// one a prior inconsistency may have produced, and reconciliation repairs
/// it instead of leaving a dangling extra edge. When nothing matches the
/// input comes back unchanged.
pub fn reconcile_local(rules: &Rules, downstream_id: &NodeId) -> Rules {
    rules
        .iter()
        .map(|(key, to)| {
            if to.contains(downstream_id) {
                tracing::debug!("severing stale edge {key} -> {downstream_id}");
                let to = to
                    .iter()
                    .filter(|id| *id != downstream_id)
                    .cloned()
                    .collect();
                (key.clone(), to)
            } else {
                (key.clone(), to.clone())
            }
        })
        .collect::<Rules>()
}

/// Compute the pipeline record to persist for a local edit.
///
/// When `rewire_target` is given, its existing upstream edges are severed
/// first, so that merging `update.to` afterwards attaches at most one. When
/// `update` is absent the pipeline is returned with only the reconciled
/// rules — the disconnect-only edit.
///
/// The returned rules never list more than one upstream edge for
/// `rewire_target`.
pub fn build_update_params(
    pipeline: &Pipeline,
    update: Option<&NodeUpdate>,
    rewire_target: Option<&NodeId>,
) -> Pipeline {
    let mut rules = pipeline.rules.clone();
    if let Some(target) = rewire_target {
        rules = reconcile_local(&rules, target);
    }

    if let Some(update) = update {
        rules.insert(update.id.clone(), update.to.clone().unwrap_or_default());
    }

    Pipeline {
        rules,
        ..pipeline.clone()
    }
}
