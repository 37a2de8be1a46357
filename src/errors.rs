//! Error types for the `st` application.

use thiserror::Error;

/// A [Result] type alias where the error is [StError].
pub type StResult<T> = Result<T, StError>;

/// An error that can occur while running `st`.
#[derive(Debug, Error)]
pub enum StError {
    /// The current working directory is not inside a git repository.
    #[error("Not in a git repository.")]
    NotAGitRepository,
    /// `st` has not been initialized for the repository.
    #[error("Repository not configured with `st`. Run `st init` first.")]
    StoreNotInitialized,
    /// `st` is already initialized for the repository.
    #[error("Repository already configured with `st`. Pass `--force` to reinitialize.")]
    StoreAlreadyInitialized,
    /// Another process holds the write lock on the store.
    #[error("The `st` store is locked by another process.")]
    StoreLocked,
    /// A staging or commit operation was attempted on a transaction that is no longer open.
    #[error("Transaction is already {0}.")]
    TransactionClosed(&'static str),
    /// The store was stored under a key that does not match its name.
    #[error("Corrupt store: record under `{key}` is named `{name}`.")]
    CorruptStore {
        /// The key the record was stored under.
        key: String,
        /// The name recorded inside the record.
        name: String,
    },
    /// A branch's parent names a branch that is not tracked.
    #[error("Inconsistent metadata: parent `{parent}` of branch `{branch}` is not tracked.")]
    DanglingParent {
        /// The branch with the dangling parent.
        branch: String,
        /// The missing parent.
        parent: String,
    },
    /// The parent chain starting at a branch loops back onto itself.
    #[error("Inconsistent metadata: cycle detected at branch `{0}`.")]
    Cycle(String),
    /// A branch is not tracked with `st`.
    #[error("Branch `{0}` is not tracked with `st`. Track it first with `st track`.")]
    BranchNotTracked(String),
    /// A branch does not exist locally.
    #[error("Branch `{0}` does not exist.")]
    BranchNotFound(String),
    /// The trunk branch cannot be tracked as a stacked branch.
    #[error("Cannot track the trunk branch.")]
    CannotTrackTrunk,
    /// The HEAD ref could not be resolved to a branch.
    #[error("HEAD is not a branch.")]
    DetachedHead,
    /// The existence check for a branch ref failed for a reason other than absence.
    #[error("Failed to check ref for branch `{branch}`: {source}")]
    RefCheck {
        /// The branch whose ref was checked.
        branch: String,
        /// The underlying git error.
        #[source]
        source: git2::Error,
    },
    /// The home directory could not be determined.
    #[error("Could not determine the home directory.")]
    NoHomeDir,
    /// A [git2::Error] occurred.
    #[error(transparent)]
    Git(#[from] git2::Error),
    /// A [std::fmt::Error] occurred while rendering output.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// An [std::io::Error] occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A TOML document could not be deserialized.
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
    /// A TOML document could not be serialized.
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
    /// An interactive prompt failed.
    #[error(transparent)]
    Prompt(#[from] inquire::InquireError),
}
