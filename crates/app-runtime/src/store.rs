//! # Backing Store Adapter
//!
//! The App talks to its backing store through `app_types::store::Store`.
//! The root store engine is an external collaborator; this adapter only
//! delegates `latest_version`. Snapshot and commit report
//! `StoreError::Unimplemented` until the engine exposes compatible
//! operations.

use std::sync::Arc;

use app_types::store::{BranchState, Hash, KvStore, StateChanges, Store, WriterMap};
use app_types::StoreError;
use parking_lot::RwLock;
use tracing::info;

/// Root store engine as seen by the adapter.
pub trait RootStore: Send + Sync {
    /// Latest version and its state.
    fn state_latest(&self) -> Result<(u64, BranchState), StoreError>;
}

/// In-memory root store used when no engine is supplied.
#[derive(Debug, Default)]
pub struct MemoryRootStore {
    inner: RwLock<(u64, BranchState)>,
}

impl MemoryRootStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a change set as a new version.
    ///
    /// Writes go to a staged copy; state and version change only if every
    /// write succeeds.
    pub fn apply(&self, changes: &[StateChanges]) -> Result<u64, StoreError> {
        let mut inner = self.inner.write();
        let mut staged = inner.1.clone();
        for change in changes {
            if change.actor.is_empty() {
                return Err(StoreError::EmptyActor);
            }
            let writer = staged.writer(&change.actor)?;
            for (key, value) in &change.pairs {
                writer.set(key, value)?;
            }
        }
        inner.1 = staged;
        inner.0 += 1;
        Ok(inner.0)
    }
}

impl RootStore for MemoryRootStore {
    fn state_latest(&self) -> Result<(u64, BranchState), StoreError> {
        let inner = self.inner.read();
        Ok((inner.0, inner.1.clone()))
    }
}

/// Adapts a root store engine to the App's store contract.
#[derive(Clone)]
pub struct RootStoreAdapter {
    root: Arc<dyn RootStore>,
}

impl RootStoreAdapter {
    pub fn new(root: Arc<dyn RootStore>) -> Self {
        Self { root }
    }
}

impl Store for RootStoreAdapter {
    fn latest_version(&self) -> Result<u64, StoreError> {
        self.root.state_latest().map(|(version, _)| version)
    }

    fn state_latest(&self) -> Result<(u64, BranchState), StoreError> {
        Err(StoreError::Unimplemented("state_latest"))
    }

    fn state_at(&self, _version: u64) -> Result<BranchState, StoreError> {
        Err(StoreError::Unimplemented("state_at"))
    }

    fn state_commit(&self, _changes: Vec<StateChanges>) -> Result<Hash, StoreError> {
        Err(StoreError::Unimplemented("state_commit"))
    }
}

/// Store for the App: the supplied engine, or an empty in-memory one.
pub fn provide_root_store(root: Option<Arc<dyn RootStore>>) -> Arc<dyn Store> {
    let root: Arc<dyn RootStore> = match root {
        Some(root) => root,
        None => {
            info!("No root store supplied, using in-memory root store");
            Arc::new(MemoryRootStore::new())
        }
    };
    Arc::new(RootStoreAdapter::new(root))
}
