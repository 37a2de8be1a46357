//! The transactional metadata store for branches tracked by `st`.
//!
//! The store is only ever mutated through a [Transaction]. A transaction is a three-state
//! machine ([TxState]): it starts [TxState::Open], and is released exactly once, either by
//! [Transaction::commit] or [Transaction::abort]. Dropping an open transaction aborts it.

use crate::{
    errors::{StError, StResult},
    graph::Branch,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod file;
pub use file::{FileStore, FileTx};

#[cfg(test)]
pub(crate) mod memory;

/// A store that hands out write transactions.
pub trait Store {
    /// The transaction type handed out by the store.
    type Tx: Transaction;

    /// Opens a write transaction. Writers are serialized for the lifetime of the transaction.
    fn write_tx(&self) -> StResult<Self::Tx>;
}

/// A write transaction against the metadata store.
pub trait Transaction {
    /// Returns the current state of the transaction.
    fn state(&self) -> TxState;

    /// Returns the name of the trunk branch.
    fn trunk(&self) -> &str;

    /// Returns an owned copy of every branch visible to the transaction.
    fn all_branches(&self) -> BTreeMap<String, Branch>;

    /// Stages a write of `branch`, replacing any record of the same name.
    fn set_branch(&mut self, branch: Branch) -> StResult<()>;

    /// Stages the removal of the record for `branch_name`.
    fn delete_branch(&mut self, branch_name: &str) -> StResult<()>;

    /// Persists every staged change at once.
    fn commit(&mut self) -> StResult<()>;

    /// Discards every staged change. A no-op unless the transaction is open.
    fn abort(&mut self);
}

/// The lifecycle state of a [Transaction].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TxState {
    /// Changes may be staged.
    Open,
    /// Staged changes were persisted.
    Committed,
    /// Staged changes were discarded.
    Aborted,
}

impl TxState {
    /// Returns an error unless the state is [TxState::Open].
    pub fn ensure_open(self) -> StResult<()> {
        match self {
            Self::Open => Ok(()),
            Self::Committed => Err(StError::TransactionClosed("committed")),
            Self::Aborted => Err(StError::TransactionClosed("aborted")),
        }
    }
}

/// The persisted form of the store.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreDocument {
    /// The name of the trunk branch.
    pub trunk_name: String,
    /// The tracked branches, keyed by name.
    #[serde(default)]
    pub branches: BTreeMap<String, Branch>,
}

impl StoreDocument {
    /// Creates an empty [StoreDocument] for the given trunk.
    pub fn new(trunk_name: impl Into<String>) -> Self {
        Self {
            trunk_name: trunk_name.into(),
            branches: BTreeMap::new(),
        }
    }

    /// Ensures every record is stored under its own name.
    pub fn check_keys(&self) -> StResult<()> {
        match self.branches.iter().find(|(key, b)| **key != b.name) {
            Some((key, b)) => Err(StError::CorruptStore {
                key: key.clone(),
                name: b.name.clone(),
            }),
            None => Ok(()),
        }
    }
}
