//! Capability views handed to the surrounding system.
//!
//! Both views are thin handles over the same `AppState` the App owns, so
//! they stay valid across the builder -> App hand-off.

use std::sync::Arc;

use app_types::StoreError;
use parking_lot::RwLock;

/// State shared between the App and its capability views.
#[derive(Debug, Default)]
pub(crate) struct AppState {
    app_version: RwLock<u64>,
}

impl AppState {
    pub(crate) fn app_version(&self) -> u64 {
        *self.app_version.read()
    }
}

/// Executes transactions found in genesis.
pub trait GenesisTxHandler: Send + Sync {
    fn execute_genesis_tx(&self, tx: &[u8]) -> Result<(), StoreError>;
}

/// Reads and updates the app version.
pub trait AppVersionModifier: Send + Sync {
    fn app_version(&self) -> Result<u64, StoreError>;

    fn set_app_version(&self, version: u64) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub(crate) struct AppView {
    state: Arc<AppState>,
}

impl AppView {
    pub(crate) fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl GenesisTxHandler for AppView {
    fn execute_genesis_tx(&self, _tx: &[u8]) -> Result<(), StoreError> {
        // Needs the state transition function, which lives outside the runtime.
        Err(StoreError::Unimplemented("genesis transaction execution"))
    }
}

impl AppVersionModifier for AppView {
    fn app_version(&self) -> Result<u64, StoreError> {
        Ok(self.state.app_version())
    }

    fn set_app_version(&self, version: u64) -> Result<(), StoreError> {
        *self.state.app_version.write() = version;
        Ok(())
    }
}
