//! Rewrites parent edges around stale branches and stages their removal.

use crate::graph::{Branch, BranchGraph, BranchState};
use std::collections::{BTreeMap, BTreeSet};

/// A live branch that was moved onto a new parent.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Reparent {
    /// The branch that was moved.
    pub branch: String,
    /// The stale parent it used to sit on.
    pub from: String,
    /// Its new parent.
    pub to: BranchState,
}

/// The changes a tidy run stages against the store.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct TidyPlan {
    /// Every live branch, with its parent rewritten where needed.
    pub writes: Vec<Branch>,
    /// The names of the stale branches to remove.
    pub deletions: Vec<String>,
    /// The parent rewrites contained in `writes`.
    pub reparented: Vec<Reparent>,
}

impl TidyPlan {
    /// Returns the number of branches the plan removes.
    pub fn tidied(&self) -> usize {
        self.deletions.len()
    }
}

/// Builds the [TidyPlan] for `graph`.
///
/// Every live branch is written back, whether or not its parent changed.
pub fn apply(
    graph: BranchGraph,
    stale: &BTreeSet<String>,
    resolved: &BTreeMap<String, BranchState>,
) -> TidyPlan {
    let mut plan = TidyPlan::default();

    for mut branch in graph.into_branches() {
        if stale.contains(&branch.name) {
            plan.deletions.push(branch.name);
            continue;
        }

        let stale_parent = branch
            .parent
            .branch_name()
            .filter(|parent| stale.contains(*parent))
            .map(ToOwned::to_owned);
        if let Some(from) = stale_parent {
            if let Some(to) = resolved.get(&from) {
                tracing::debug!(branch = %branch.name, %from, %to, "Reparenting branch");
                plan.reparented.push(Reparent {
                    branch: branch.name.clone(),
                    from,
                    to: to.clone(),
                });
                branch.parent = to.clone();
            }
        }

        plan.writes.push(branch);
    }

    plan
}

#[cfg(test)]
mod test {
    use super::apply;
    use crate::graph::{test::graph, BranchState};
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn rewrites_children_of_stale_branches() {
        let graph = graph(&[("a", "main"), ("b", "a"), ("c", "a"), ("d", "main")]);
        let stale = BTreeSet::from(["a".to_string()]);
        let resolved = BTreeMap::from([("a".to_string(), BranchState::Trunk)]);

        let plan = apply(graph, &stale, &resolved);

        assert_eq!(plan.deletions, vec!["a"]);
        assert_eq!(plan.tidied(), 1);
        assert_eq!(plan.writes.len(), 3);
        assert!(plan.writes.iter().all(|b| b.parent == BranchState::Trunk));
        assert_eq!(
            plan.reparented
                .iter()
                .map(|r| r.branch.as_str())
                .collect::<Vec<_>>(),
            vec!["b", "c"]
        );
    }

    #[test]
    fn leaves_unrelated_edges_alone() {
        let graph = graph(&[("a", "main"), ("b", "a"), ("x", "missing")]);

        let plan = apply(graph, &BTreeSet::new(), &BTreeMap::new());

        assert!(plan.deletions.is_empty());
        assert!(plan.reparented.is_empty());
        assert_eq!(plan.writes.len(), 3);
        let x = plan.writes.iter().find(|b| b.name == "x").unwrap();
        assert_eq!(x.parent, BranchState::Ref("missing".to_string()));
    }
}
