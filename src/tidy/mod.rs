//! Removes stale branches from the store and re-parents their live descendants.
//!
//! A tidy run happens inside a single write transaction:
//! 1. Load a snapshot of every tracked branch.
//! 2. Classify branches as stale ([classify]).
//! 3. Map each stale branch to its nearest live ancestor ([resolve]).
//! 4. Rewrite parent edges and stage removals ([mutate]).
//! 5. Commit, or abort on any error.

use crate::{
    errors::StResult,
    git::RefCheck,
    graph::BranchGraph,
    store::{Store, Transaction},
};

mod classify;
pub use classify::{is_stale, stale_branches, RefCheckMode};

mod resolve;
pub use resolve::resolve_live_ancestors;

mod mutate;
pub use mutate::{apply, Reparent, TidyPlan};

/// Options for a tidy run.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct TidyOptions {
    /// How failed ref checks are interpreted.
    pub mode: RefCheckMode,
    /// Compute the changes, then abort instead of committing them.
    pub dry_run: bool,
}

/// The outcome of a tidy run.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct TidySummary {
    /// The stale branches whose records were removed.
    pub removed: Vec<String>,
    /// The live branches that were moved onto a new parent.
    pub reparented: Vec<Reparent>,
    /// Whether the changes were committed.
    pub committed: bool,
}

impl TidySummary {
    /// Returns the number of removed branches. Zero means there was nothing to tidy.
    pub fn tidied(&self) -> usize {
        self.removed.len()
    }
}

/// Tidies the store, removing stale branches and re-parenting their live descendants onto
/// their nearest live ancestor.
///
/// The transaction is committed exactly once on success, and aborted on every other path.
pub fn tidy<S, R>(store: &S, refs: &R, options: TidyOptions) -> StResult<TidySummary>
where
    S: Store + ?Sized,
    R: RefCheck + ?Sized,
{
    let mut tx = store.write_tx()?;

    let plan = match stage(&mut tx, refs, options.mode) {
        Ok(plan) => plan,
        Err(e) => {
            tx.abort();
            return Err(e);
        }
    };

    let committed = if options.dry_run {
        tx.abort();
        false
    } else {
        if let Err(e) = tx.commit() {
            tx.abort();
            return Err(e);
        }
        true
    };

    tracing::info!(
        removed = plan.deletions.len(),
        reparented = plan.reparented.len(),
        committed,
        "Tidied stacked branches"
    );
    Ok(TidySummary {
        removed: plan.deletions,
        reparented: plan.reparented,
        committed,
    })
}

/// Computes the [TidyPlan] for the transaction's snapshot and stages it.
fn stage<T, R>(tx: &mut T, refs: &R, mode: RefCheckMode) -> StResult<TidyPlan>
where
    T: Transaction + ?Sized,
    R: RefCheck + ?Sized,
{
    let graph = BranchGraph::load_snapshot(&*tx);
    let stale = stale_branches(&graph, refs, mode)?;
    let resolved = resolve_live_ancestors(&graph, &stale)?;
    let mut plan = apply(graph, &stale, &resolved);

    for branch_name in &plan.deletions {
        tx.delete_branch(branch_name)?;
    }
    for branch in std::mem::take(&mut plan.writes) {
        tx.set_branch(branch)?;
    }

    Ok(plan)
}
