//! Utilities for interacting with `git` repositories for the `st` application.

use crate::{
    constants::HEADS_PREFIX,
    errors::{StError, StResult},
};
use git2::{BranchType, ErrorCode, Repository};
use std::env;

/// Returns the repository for the current working directory, and [None] if
/// the current working directory is not within a git repository or an error
/// occurs.
pub fn active_repository() -> Option<Repository> {
    Repository::discover(env::current_dir().ok()?).ok()
}

/// Extension trait for the [Repository] type to expose helper functions related to
/// repository management.
pub trait RepositoryExt {
    /// Returns the name of the checked out branch.
    ///
    /// ## Returns
    /// - `Ok(String)` - The name of the current branch.
    /// - `Err(StError::DetachedHead)` - If `HEAD` does not point at a branch.
    fn current_branch_name(&self) -> StResult<String>;

    /// Returns the names of all local branches, skipping names that are not valid UTF-8.
    fn local_branch_names(&self) -> StResult<Vec<String>>;

    /// Returns whether a local branch named `branch_name` exists.
    fn branch_exists(&self, branch_name: &str) -> bool;
}

impl RepositoryExt for Repository {
    fn current_branch_name(&self) -> StResult<String> {
        let head = self.head()?;
        if !head.is_branch() {
            return Err(StError::DetachedHead);
        }
        head.shorthand()
            .map(ToOwned::to_owned)
            .ok_or(StError::DetachedHead)
    }

    fn local_branch_names(&self) -> StResult<Vec<String>> {
        self.branches(Some(BranchType::Local))?
            .map(|b| -> StResult<Option<String>> {
                let (b, _) = b?;
                Ok(b.name()?.map(ToOwned::to_owned))
            })
            .filter_map(Result::transpose)
            .collect()
    }

    fn branch_exists(&self, branch_name: &str) -> bool {
        self.find_branch(branch_name, BranchType::Local).is_ok()
    }
}

/// The version-control existence query used to classify branches.
pub trait RefCheck {
    /// Checks whether `refs/heads/<branch_name>` exists.
    ///
    /// ## Returns
    /// - `Ok(true)` - The ref exists.
    /// - `Ok(false)` - The ref is absent.
    /// - `Err(StError::RefCheck)` - The query itself failed.
    fn branch_ref_exists(&self, branch_name: &str) -> StResult<bool>;
}

impl RefCheck for Repository {
    fn branch_ref_exists(&self, branch_name: &str) -> StResult<bool> {
        match self.find_reference(&format!("{}{}", HEADS_PREFIX, branch_name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(source) => Err(StError::RefCheck {
                branch: branch_name.to_string(),
                source,
            }),
        }
    }
}
