//! The in-memory model of the branches tracked by `st` and their parent edges.

use crate::{
    errors::{StError, StResult},
    store::Transaction,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
};

mod fmt;
pub(crate) use fmt::DisplayBranch;

/// The parent edge of a tracked branch.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "kebab-case")]
pub enum BranchState {
    /// The branch sits directly on top of the trunk.
    Trunk,
    /// The branch sits on top of another tracked branch.
    Ref(String),
}

impl BranchState {
    /// Returns the name of the parent branch, or [None] if the parent is the trunk.
    pub fn branch_name(&self) -> Option<&str> {
        match self {
            Self::Trunk => None,
            Self::Ref(name) => Some(name.as_str()),
        }
    }
}

impl Display for BranchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trunk => write!(f, "<trunk>"),
            Self::Ref(name) => write!(f, "{}", name),
        }
    }
}

/// A branch tracked by `st`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Branch {
    /// The branch name.
    pub name: String,
    /// The commit the branch was merged in, if it has been merged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit: Option<String>,
    /// The logical parent of the branch.
    pub parent: BranchState,
}

impl Branch {
    /// Creates a new, unmerged [Branch].
    pub fn new(name: impl Into<String>, parent: BranchState) -> Self {
        Self {
            name: name.into(),
            parent,
            merge_commit: None,
        }
    }

    /// Returns `true` if the branch records a non-empty merge commit.
    pub fn is_merged(&self) -> bool {
        self.merge_commit.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// A working copy of all tracked branches, keyed by name.
///
/// Mutating a [BranchGraph] never touches the store it was loaded from; changes must be
/// staged back through a [Transaction].
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct BranchGraph {
    /// The name of the trunk branch.
    pub trunk_name: String,
    branches: BTreeMap<String, Branch>,
}

impl BranchGraph {
    /// Creates a new [BranchGraph] from a set of branches.
    pub fn new(trunk_name: impl Into<String>, branches: BTreeMap<String, Branch>) -> Self {
        Self {
            trunk_name: trunk_name.into(),
            branches,
        }
    }

    /// Loads a point-in-time copy of every branch visible to the transaction.
    pub fn load_snapshot<T: Transaction + ?Sized>(tx: &T) -> Self {
        Self::new(tx.trunk(), tx.all_branches())
    }

    /// Gets a branch by name.
    pub fn get(&self, branch_name: &str) -> Option<&Branch> {
        self.branches.get(branch_name)
    }

    /// Returns `true` if a branch by the name of `branch_name` is tracked.
    pub fn contains(&self, branch_name: &str) -> bool {
        self.branches.contains_key(branch_name)
    }

    /// Iterates over the tracked branches in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Consumes the graph, yielding its branches in name order.
    pub fn into_branches(self) -> impl Iterator<Item = Branch> {
        self.branches.into_values()
    }

    /// Returns the branches whose parent is `parent`, in name order.
    pub fn children<'a>(&'a self, parent: &'a BranchState) -> impl Iterator<Item = &'a Branch> {
        self.branches.values().filter(move |b| &b.parent == parent)
    }

    /// Returns the branches sitting directly on the trunk, in name order.
    pub fn roots(&self) -> impl Iterator<Item = &Branch> {
        self.branches
            .values()
            .filter(|b| b.parent == BranchState::Trunk)
    }

    /// Normalizes a parent name into a [BranchState], mapping the trunk's name to
    /// [BranchState::Trunk].
    pub fn state_for(&self, parent_name: &str) -> BranchState {
        if parent_name == self.trunk_name {
            BranchState::Trunk
        } else {
            BranchState::Ref(parent_name.to_string())
        }
    }

    /// Returns `true` if walking up from `parent` reaches `branch_name`, i.e. making
    /// `parent` the parent of `branch_name` would close a cycle.
    pub fn would_cycle(&self, branch_name: &str, parent: &BranchState) -> bool {
        let mut seen = HashSet::new();
        let mut state = parent;
        while let BranchState::Ref(name) = state {
            if name == branch_name {
                return true;
            }
            if !seen.insert(name.as_str()) {
                return false;
            }
            match self.branches.get(name) {
                Some(branch) => state = &branch.parent,
                None => return false,
            }
        }
        false
    }

    /// Checks that every parent edge names a tracked branch and that every parent chain
    /// terminates at the trunk.
    ///
    /// ## Returns
    /// - `Ok(())` - The graph is an acyclic forest rooted at the trunk.
    /// - `Err(StError::DanglingParent)` - A parent edge names an untracked branch.
    /// - `Err(StError::Cycle)` - A parent chain loops.
    pub fn validate(&self) -> StResult<()> {
        for branch in self.branches.values() {
            let mut seen = HashSet::from([branch.name.as_str()]);
            let mut current = branch;
            while let BranchState::Ref(parent) = &current.parent {
                let next = self
                    .branches
                    .get(parent)
                    .ok_or_else(|| StError::DanglingParent {
                        branch: current.name.clone(),
                        parent: parent.clone(),
                    })?;
                if !seen.insert(parent.as_str()) {
                    return Err(StError::Cycle(parent.clone()));
                }
                current = next;
            }
        }
        Ok(())
    }
}
