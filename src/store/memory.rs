//! An in-memory [Store] for tests, with commit-failure injection.

use super::{Store, StoreDocument, Transaction, TxState};
use crate::{errors::StResult, graph::Branch};
use std::{cell::RefCell, collections::BTreeMap, io, rc::Rc};

/// An in-memory store whose transactions can be made to fail on commit.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    document: StoreDocument,
    fail_commit: bool,
    commits: usize,
    writes: usize,
}

impl MemoryStore {
    /// Creates a store holding `branches` on top of the `main` trunk.
    pub(crate) fn new(branches: impl IntoIterator<Item = Branch>) -> Self {
        let mut document = StoreDocument::new("main");
        document.branches = branches
            .into_iter()
            .map(|b| (b.name.clone(), b))
            .collect();
        Self {
            inner: Rc::new(RefCell::new(Inner {
                document,
                ..Default::default()
            })),
        }
    }

    /// Makes every subsequent commit fail.
    pub(crate) fn fail_commits(&self) {
        self.inner.borrow_mut().fail_commit = true;
    }

    /// Returns the committed branches.
    pub(crate) fn branches(&self) -> BTreeMap<String, Branch> {
        self.inner.borrow().document.branches.clone()
    }

    /// Returns the number of successful commits.
    pub(crate) fn commits(&self) -> usize {
        self.inner.borrow().commits
    }

    /// Returns the number of `set_branch` calls that reached a successful commit.
    pub(crate) fn writes(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl Store for MemoryStore {
    type Tx = MemoryTx;

    fn write_tx(&self) -> StResult<MemoryTx> {
        let staged = self.inner.borrow().document.clone();
        Ok(MemoryTx {
            inner: Rc::clone(&self.inner),
            state: TxState::Open,
            staged,
            writes: 0,
        })
    }
}

/// A transaction against a [MemoryStore].
#[derive(Debug)]
pub(crate) struct MemoryTx {
    inner: Rc<RefCell<Inner>>,
    state: TxState,
    staged: StoreDocument,
    writes: usize,
}

impl Transaction for MemoryTx {
    fn state(&self) -> TxState {
        self.state
    }

    fn trunk(&self) -> &str {
        &self.staged.trunk_name
    }

    fn all_branches(&self) -> BTreeMap<String, Branch> {
        self.staged.branches.clone()
    }

    fn set_branch(&mut self, branch: Branch) -> StResult<()> {
        self.state.ensure_open()?;
        self.writes += 1;
        self.staged.branches.insert(branch.name.clone(), branch);
        Ok(())
    }

    fn delete_branch(&mut self, branch_name: &str) -> StResult<()> {
        self.state.ensure_open()?;
        self.staged.branches.remove(branch_name);
        Ok(())
    }

    fn commit(&mut self) -> StResult<()> {
        self.state.ensure_open()?;
        let mut inner = self.inner.borrow_mut();
        if inner.fail_commit {
            drop(inner);
            self.abort();
            return Err(io::Error::new(io::ErrorKind::Other, "injected commit failure").into());
        }

        inner.document = self.staged.clone();
        inner.commits += 1;
        inner.writes += self.writes;
        drop(inner);
        self.state = TxState::Committed;
        Ok(())
    }

    fn abort(&mut self) {
        if self.state == TxState::Open {
            self.state = TxState::Aborted;
        }
    }
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        self.abort();
    }
}
