//! The in-memory context of the `st` application.

use crate::{config::StConfig, errors::StResult, graph::BranchGraph, store::FileStore};
use git2::Repository;

/// The in-memory context of the `st` application.
pub struct StContext<'a> {
    /// The repository associated with the store.
    pub repository: &'a Repository,
    /// The metadata store for the repository.
    pub store: FileStore,
    /// The user configuration.
    pub config: StConfig,
}

impl<'a> StContext<'a> {
    /// Creates a [StContext] for the given [Repository].
    pub fn new(repository: &'a Repository, config: StConfig) -> Self {
        let store = FileStore::for_repository(repository);
        tracing::debug!(store = %store.path().display(), "Loaded context");
        Self {
            repository,
            store,
            config,
        }
    }

    /// Reads the tracked branches without taking the write lock.
    pub fn graph(&self) -> StResult<BranchGraph> {
        let document = self.store.read()?;
        Ok(BranchGraph::new(document.trunk_name, document.branches))
    }
}
