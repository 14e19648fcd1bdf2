//! # Assembled App
//!
//! The App is produced once by composition and then handed to an external
//! execution engine. Its store key set and module set never change after
//! that; only the backing store and the app version are live.

pub mod builder;
pub mod capabilities;

use std::sync::Arc;

use app_types::codec::{Codec, SharedInterfaceRegistry, SharedLegacyAmino};
use app_types::module::ServiceRegistrar;
use app_types::router::MsgRouter;
use app_types::store::Store;
use app_types::{Capability, Logger, StoreKey};

pub use builder::{AppBuilder, SharedAppBuilder};
pub use capabilities::{AppVersionModifier, GenesisTxHandler};

use crate::app::capabilities::{AppState, AppView};
use crate::config::RuntimeConfig;
use crate::error::CompositionError;
use crate::module_manager::ModuleManager;
use crate::services;

/// Fully assembled application.
pub struct App {
    pub(crate) config: Arc<RuntimeConfig>,
    pub(crate) store_keys: Vec<StoreKey>,
    pub(crate) interface_registry: SharedInterfaceRegistry,
    pub(crate) codec: Codec,
    pub(crate) amino: SharedLegacyAmino,
    pub(crate) msg_router: MsgRouter,
    pub(crate) query_router: Capability<MsgRouter>,
    pub(crate) module_manager: ModuleManager,
    pub(crate) logger: Logger,
    pub(crate) store: Arc<dyn Store>,
    pub(crate) state: Arc<AppState>,
}

impl App {
    pub fn name(&self) -> &str {
        &self.config.app.name
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Keys in allocation order.
    pub fn store_keys(&self) -> &[StoreKey] {
        &self.store_keys
    }

    pub fn store_key(&self, name: &str) -> Option<&StoreKey> {
        self.store_keys.iter().find(|key| key.name() == name)
    }

    pub fn interface_registry(&self) -> &SharedInterfaceRegistry {
        &self.interface_registry
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn legacy_amino(&self) -> &SharedLegacyAmino {
        &self.amino
    }

    pub fn msg_router(&self) -> &MsgRouter {
        &self.msg_router
    }

    /// Reserved; no query router is wired yet.
    pub fn query_router(&self) -> &Capability<MsgRouter> {
        &self.query_router
    }

    pub fn module_manager(&self) -> &ModuleManager {
        &self.module_manager
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn app_version(&self) -> u64 {
        self.state.app_version()
    }

    pub fn genesis_tx_handler(&self) -> Arc<dyn GenesisTxHandler> {
        Arc::new(AppView::new(Arc::clone(&self.state)))
    }

    pub fn app_version_modifier(&self) -> Arc<dyn AppVersionModifier> {
        Arc::new(AppView::new(Arc::clone(&self.state)))
    }

    /// Register every module's services, then the runtime's own
    /// introspection services.
    pub fn register_services(
        &self,
        registrar: &mut dyn ServiceRegistrar,
    ) -> Result<(), CompositionError> {
        self.module_manager.register_services(registrar)?;
        services::register_runtime_services(
            registrar,
            &self.module_manager,
            &self.interface_registry.read(),
        )?;
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.config.app.name)
            .field("store_keys", &self.store_keys)
            .field("modules", &self.module_manager.names())
            .field("msg_handlers", &self.msg_router.len())
            .finish()
    }
}
