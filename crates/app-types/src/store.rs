//! # Store Contracts
//!
//! Store keys identify one module's exclusive storage namespace. The
//! execution engine owns the actual state; modules reach it through a
//! `WriterMap`, which hands out one writer per actor (store key name).
//!
//! ## Backing Store Contract
//!
//! ```text
//! latest_version()        -> version
//! state_at(version)       -> readable snapshot
//! state_commit(changes)   -> root hash
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// A 32-byte state root hash.
pub type Hash = [u8; 32];

// =============================================================================
// STORE KEYS
// =============================================================================

/// Kind of storage namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKind {
    /// Persistent key-value store, committed with the state root.
    Persistent,
    /// In-memory store, never committed.
    Memory,
}

/// Identifies one module's exclusive storage namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
    name: String,
    kind: StoreKind,
}

impl StoreKey {
    /// Create a persistent store key.
    pub fn persistent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StoreKind::Persistent,
        }
    }

    /// Create a memory store key.
    pub fn memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StoreKind::Memory,
        }
    }

    /// The namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace kind.
    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Actor bytes used to address this namespace in a `WriterMap`.
    pub fn actor(&self) -> Vec<u8> {
        self.name.as_bytes().to_vec()
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// =============================================================================
// KEY-VALUE ACCESS
// =============================================================================

/// Key-value access to a single namespace.
pub trait KvStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Set a key-value pair.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// Check if a key exists.
    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-memory namespace, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKvStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All pairs in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.data.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.data.remove(key);
        Ok(())
    }
}

/// Hands out one writer per actor. Supplied by the execution engine.
pub trait WriterMap {
    /// Writer for the namespace addressed by `actor`.
    fn writer(&mut self, actor: &[u8]) -> Result<&mut dyn KvStore, StoreError>;
}

/// All changes made to one actor's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChanges {
    pub actor: Vec<u8>,
    pub pairs: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Branch of state split per actor, used by engines and tests alike.
#[derive(Debug, Clone, Default)]
pub struct BranchState {
    actors: BTreeMap<Vec<u8>, MemoryKvStore>,
}

impl BranchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of one actor's namespace.
    pub fn actor(&self, actor: &[u8]) -> Option<&MemoryKvStore> {
        self.actors.get(actor)
    }

    /// Collect changes in actor order.
    pub fn changes(&self) -> Vec<StateChanges> {
        self.actors
            .iter()
            .map(|(actor, store)| StateChanges {
                actor: actor.clone(),
                pairs: store
                    .pairs()
                    .map(|(k, v)| (k.to_vec(), v.to_vec()))
                    .collect(),
            })
            .collect()
    }
}

impl WriterMap for BranchState {
    fn writer(&mut self, actor: &[u8]) -> Result<&mut dyn KvStore, StoreError> {
        let store: &mut dyn KvStore = self.actors.entry(actor.to_vec()).or_default();
        Ok(store)
    }
}

// =============================================================================
// BACKING STORE
// =============================================================================

/// Backing store consumed by the App. Implemented outside this workspace.
pub trait Store: Send + Sync {
    /// Latest committed version.
    fn latest_version(&self) -> Result<u64, StoreError>;

    /// Latest version together with its snapshot.
    fn state_latest(&self) -> Result<(u64, BranchState), StoreError>;

    /// Readable snapshot at `version`.
    fn state_at(&self, version: u64) -> Result<BranchState, StoreError>;

    /// Commit a change set, returning the new root hash.
    fn state_commit(&self, changes: Vec<StateChanges>) -> Result<Hash, StoreError>;
}
