//! Finds the nearest live ancestor of each stale branch.

use crate::{
    errors::{StError, StResult},
    graph::{Branch, BranchGraph, BranchState},
};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Maps every stale branch to the first parent state up its chain that is either the trunk
/// or a branch that is not stale.
///
/// ## Returns
/// - `Ok(_)` - The stale-to-live-ancestor map.
/// - `Err(StError::Cycle)` - A chain of stale branches loops back onto itself.
pub fn resolve_live_ancestors(
    graph: &BranchGraph,
    stale: &BTreeSet<String>,
) -> StResult<BTreeMap<String, BranchState>> {
    stale
        .iter()
        .map(|name| {
            let branch = graph
                .get(name)
                .ok_or_else(|| StError::BranchNotTracked(name.clone()))?;
            let ancestor = nearest_live_ancestor(graph, stale, branch)?;
            Ok((name.clone(), ancestor))
        })
        .collect()
}

/// Walks up from the parent of `branch`, skipping stale branches.
fn nearest_live_ancestor(
    graph: &BranchGraph,
    stale: &BTreeSet<String>,
    branch: &Branch,
) -> StResult<BranchState> {
    let mut visited = HashSet::from([branch.name.as_str()]);
    let mut state = &branch.parent;

    while let BranchState::Ref(name) = state {
        if !stale.contains(name) {
            break;
        }
        if !visited.insert(name.as_str()) {
            return Err(StError::Cycle(name.clone()));
        }
        state = &graph
            .get(name)
            .ok_or_else(|| StError::BranchNotTracked(name.clone()))?
            .parent;
    }

    Ok(state.clone())
}
