//! A [Store] persisted as a TOML document inside the repository's git directory.

use super::{Store, StoreDocument, Transaction, TxState};
use crate::{
    constants::{ST_STORE_FILE_NAME, ST_STORE_LOCK_FILE_NAME},
    errors::{StError, StResult},
    graph::Branch,
};
use fs2::FileExt;
use git2::Repository;
use std::{
    collections::BTreeMap,
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// The TOML-backed metadata store.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStore {
    store_path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Creates a [FileStore] rooted in the given git directory.
    pub fn new(git_dir: &Path) -> Self {
        Self {
            store_path: git_dir.join(ST_STORE_FILE_NAME),
            lock_path: git_dir.join(ST_STORE_LOCK_FILE_NAME),
        }
    }

    /// Creates a [FileStore] for the given [Repository].
    ///
    /// The store lives in the common git directory, so every linked worktree shares one
    /// document and one write lock.
    pub fn for_repository(repository: &Repository) -> Self {
        Self::new(repository.commondir())
    }

    /// Returns the path of the store document.
    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// Returns `true` if the store document exists.
    pub fn is_initialized(&self) -> bool {
        self.store_path.exists()
    }

    /// Writes an empty store document recording `trunk_name` as the trunk.
    ///
    /// ## Takes
    /// - `trunk_name` - The name of the trunk branch.
    /// - `force` - Overwrite an existing store, discarding every tracked branch.
    pub fn initialize(&self, trunk_name: &str, force: bool) -> StResult<()> {
        let lock = self.lock()?;
        if self.is_initialized() && !force {
            return Err(StError::StoreAlreadyInitialized);
        }

        write_atomic(&self.store_path, &StoreDocument::new(trunk_name))?;
        unlock(&lock);
        Ok(())
    }

    /// Reads the store document without taking the write lock.
    pub fn read(&self) -> StResult<StoreDocument> {
        if !self.is_initialized() {
            return Err(StError::StoreNotInitialized);
        }

        let document: StoreDocument = toml::from_str(&fs::read_to_string(&self.store_path)?)?;
        document.check_keys()?;
        Ok(document)
    }

    /// Takes the exclusive write lock, failing fast if another process holds it.
    fn lock(&self) -> StResult<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(file),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(StError::StoreLocked),
            Err(e) => Err(e.into()),
        }
    }
}

impl Store for FileStore {
    type Tx = FileTx;

    fn write_tx(&self) -> StResult<FileTx> {
        let lock = self.lock()?;
        let document = self.read()?;
        tracing::debug!(
            path = %self.store_path.display(),
            branches = document.branches.len(),
            "Opened write transaction"
        );

        Ok(FileTx {
            store_path: self.store_path.clone(),
            lock: Some(lock),
            state: TxState::Open,
            staged: document,
        })
    }
}

/// A write transaction against a [FileStore]. Holds the store's write lock until released.
#[derive(Debug)]
pub struct FileTx {
    store_path: PathBuf,
    lock: Option<File>,
    state: TxState,
    staged: StoreDocument,
}

impl FileTx {
    fn release(&mut self, state: TxState) {
        self.state = state;
        if let Some(lock) = self.lock.take() {
            unlock(&lock);
        }
    }
}

impl Transaction for FileTx {
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
        if let Err(e) = write_atomic(&self.store_path, &self.staged) {
            self.abort();
            return Err(e);
        }

        tracing::info!(
            path = %self.store_path.display(),
            branches = self.staged.branches.len(),
            "Committed store"
        );
        self.release(TxState::Committed);
        Ok(())
    }

    fn abort(&mut self) {
        if self.state == TxState::Open {
            tracing::debug!(path = %self.store_path.display(), "Aborted write transaction");
            self.release(TxState::Aborted);
        }
    }
}

impl Drop for FileTx {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Serializes `document` next to `path` and renames it into place, so readers only ever
/// observe a complete document.
fn write_atomic(path: &Path, document: &StoreDocument) -> StResult<()> {
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, toml::to_string_pretty(document)?)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn unlock(lock: &File) {
    if let Err(e) = lock.unlock() {
        tracing::warn!("Failed to release store lock: {}", e);
    }
}

#[cfg(test)]
mod test {
    use super::FileStore;
    use crate::{
        errors::StError,
        graph::{Branch, BranchState},
        store::{Store, Transaction, TxState},
        test_util::TestRepo,
    };
    use git2::Repository;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.initialize("main", false).unwrap();
        (dir, store)
    }

    #[test]
    fn uninitialized_store_rejects_transactions() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.write_tx(), Err(StError::StoreNotInitialized)));
    }

    #[test]
    fn initialize_refuses_to_clobber_without_force() {
        let (_dir, store) = store();
        assert!(matches!(
            store.initialize("develop", false),
            Err(StError::StoreAlreadyInitialized)
        ));

        store.initialize("develop", true).unwrap();
        assert_eq!(store.read().unwrap().trunk_name, "develop");
    }

    #[test]
    fn commit_persists_staged_changes() {
        let (_dir, store) = store();

        let mut tx = store.write_tx().unwrap();
        assert_eq!(tx.trunk(), "main");
        tx.set_branch(Branch::new("a", BranchState::Trunk)).unwrap();
        tx.set_branch(Branch::new("b", BranchState::Ref("a".to_string())))
            .unwrap();
        tx.commit().unwrap();
        assert_eq!(tx.state(), TxState::Committed);
        drop(tx);

        let mut tx = store.write_tx().unwrap();
        let branches = tx.all_branches();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches["b"].parent, BranchState::Ref("a".to_string()));

        tx.delete_branch("a").unwrap();
        tx.commit().unwrap();
        drop(tx);

        let document = store.read().unwrap();
        assert_eq!(document.branches.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn dropped_transaction_discards_changes() {
        let (_dir, store) = store();

        {
            let mut tx = store.write_tx().unwrap();
            tx.set_branch(Branch::new("a", BranchState::Trunk)).unwrap();
        }

        assert!(store.read().unwrap().branches.is_empty());
    }

    #[test]
    fn snapshot_is_an_independent_copy() {
        let (_dir, store) = store();

        let mut tx = store.write_tx().unwrap();
        tx.set_branch(Branch::new("a", BranchState::Trunk)).unwrap();
        let mut snapshot = tx.all_branches();
        snapshot.get_mut("a").unwrap().parent = BranchState::Ref("x".to_string());

        assert_eq!(tx.all_branches()["a"].parent, BranchState::Trunk);
    }

    #[test]
    fn writers_are_serialized() {
        let (_dir, store) = store();

        let tx = store.write_tx().unwrap();
        assert!(matches!(store.write_tx(), Err(StError::StoreLocked)));
        drop(tx);

        store.write_tx().unwrap();
    }

    #[test]
    fn released_transactions_reject_further_use() {
        let (_dir, store) = store();

        let mut tx = store.write_tx().unwrap();
        tx.commit().unwrap();
        tx.abort();
        assert_eq!(tx.state(), TxState::Committed);
        assert!(matches!(
            tx.commit(),
            Err(StError::TransactionClosed("committed"))
        ));
        assert!(tx.set_branch(Branch::new("a", BranchState::Trunk)).is_err());

        let mut tx = store.write_tx().unwrap();
        tx.abort();
        tx.abort();
        assert_eq!(tx.state(), TxState::Aborted);
        assert!(tx.delete_branch("a").is_err());
    }

    #[test]
    fn linked_worktrees_share_the_store() {
        let repo = TestRepo::new();
        let main_store = FileStore::for_repository(&repo.repo);
        main_store.initialize("main", false).unwrap();

        let wt_dir = TempDir::new().unwrap();
        let worktree = repo
            .repo
            .worktree("wt", &wt_dir.path().join("wt"), None)
            .unwrap();
        let wt_repo = Repository::open_from_worktree(&worktree).unwrap();
        let wt_store = FileStore::for_repository(&wt_repo);
        assert_eq!(wt_store.path(), main_store.path());

        let mut tx = wt_store.write_tx().unwrap();
        assert!(matches!(main_store.write_tx(), Err(StError::StoreLocked)));
        tx.set_branch(Branch::new("a", BranchState::Trunk)).unwrap();
        tx.commit().unwrap();
        drop(tx);

        assert!(main_store.read().unwrap().branches.contains_key("a"));
    }

    #[test]
    fn rejects_corrupt_documents() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            "trunk-name = \"main\"\n\n[branches.a]\nname = \"b\"\n\n[branches.a.parent]\nkind = \"trunk\"\n",
        )
        .unwrap();

        assert!(matches!(store.read(), Err(StError::CorruptStore { .. })));
    }
}
