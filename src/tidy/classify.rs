//! Decides which tracked branches are stale.

use crate::{
    errors::StResult,
    git::RefCheck,
    graph::{Branch, BranchGraph},
};
use std::collections::BTreeSet;

/// How a failed ref-existence query is interpreted.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum RefCheckMode {
    /// A failed query marks the branch stale, same as an absent ref.
    #[default]
    Lenient,
    /// A failed query aborts the run.
    Strict,
}

/// Returns the names of every stale branch in the graph.
pub fn stale_branches<R: RefCheck + ?Sized>(
    graph: &BranchGraph,
    refs: &R,
    mode: RefCheckMode,
) -> StResult<BTreeSet<String>> {
    let mut stale = BTreeSet::new();
    for branch in graph.iter() {
        if is_stale(branch, refs, mode)? {
            stale.insert(branch.name.clone());
        }
    }
    Ok(stale)
}

/// Returns `true` if `branch` has been merged, or if its ref no longer exists.
///
/// A recorded merge commit wins over the ref check, which is skipped entirely.
pub fn is_stale<R: RefCheck + ?Sized>(
    branch: &Branch,
    refs: &R,
    mode: RefCheckMode,
) -> StResult<bool> {
    if branch.is_merged() {
        tracing::debug!(branch = %branch.name, "Branch is merged");
        return Ok(true);
    }

    match refs.branch_ref_exists(&branch.name) {
        Ok(true) => Ok(false),
        Ok(false) => {
            tracing::debug!(branch = %branch.name, "Branch ref no longer exists");
            Ok(true)
        }
        Err(e) if mode == RefCheckMode::Lenient => {
            tracing::warn!(branch = %branch.name, error = %e, "Ref check failed, treating branch as stale");
            Ok(true)
        }
        Err(e) => Err(e),
    }
}
