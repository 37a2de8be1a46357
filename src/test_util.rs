//! Shared fixtures for unit tests.

use crate::{
    errors::{StError, StResult},
    git::RefCheck,
};
use git2::{Repository, RepositoryInitOptions, Signature};
use std::collections::HashSet;
use tempfile::TempDir;

/// A throwaway git repository with a single commit on `main`.
pub(crate) struct TestRepo {
    pub(crate) repo: Repository,
    pub(crate) dir: TempDir,
}

impl TestRepo {
    /// Initializes a repository whose `main` branch holds an empty initial commit.
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).unwrap();

        {
            let signature = Signature::now("st", "st@example.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                "Initial commit",
                &tree,
                &[],
            )
            .unwrap();
        }

        Self { repo, dir }
    }

    /// Creates a local branch pointing at `HEAD`.
    pub(crate) fn branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
    }

    /// Deletes a local branch.
    pub(crate) fn delete_branch(&self, name: &str) {
        self.repo
            .find_branch(name, git2::BranchType::Local)
            .unwrap()
            .delete()
            .unwrap();
    }
}

/// A [RefCheck] answering from fixed sets of present and unreadable branch refs.
#[derive(Debug, Default)]
pub(crate) struct FakeRefs {
    present: HashSet<String>,
    broken: HashSet<String>,
}

impl FakeRefs {
    /// Creates a [FakeRefs] where exactly `names` exist.
    pub(crate) fn with(names: &[&str]) -> Self {
        Self {
            present: names.iter().map(|n| n.to_string()).collect(),
            broken: HashSet::new(),
        }
    }

    /// Makes the existence check for `name` fail.
    pub(crate) fn broken(mut self, name: &str) -> Self {
        self.broken.insert(name.to_string());
        self
    }
}

impl RefCheck for FakeRefs {
    fn branch_ref_exists(&self, branch_name: &str) -> StResult<bool> {
        if self.broken.contains(branch_name) {
            return Err(StError::RefCheck {
                branch: branch_name.to_string(),
                source: git2::Error::from_str("ref lookup failed"),
            });
        }
        Ok(self.present.contains(branch_name))
    }
}
