//! Mutable assembly target for one App.

use std::collections::BTreeSet;
use std::sync::Arc;

use app_types::codec::{Codec, SharedInterfaceRegistry, SharedLegacyAmino};
use app_types::router::SharedMsgRouterBuilder;
use app_types::store::Store;
use app_types::{Capability, Logger, StoreKey};
use parking_lot::RwLock;
use tracing::info;

use crate::app::capabilities::{AppState, AppVersionModifier, AppView, GenesisTxHandler};
use crate::app::App;
use crate::config::RuntimeConfig;
use crate::error::CompositionError;
use crate::module_manager::ModuleManager;

/// Builder shared between composition steps.
pub type SharedAppBuilder = Arc<RwLock<AppBuilder>>;

/// Fields frozen by `finalize`.
struct Finalized {
    module_manager: ModuleManager,
    logger: Logger,
    store: Arc<dyn Store>,
}

/// Accumulates store keys and codecs until setup freezes them.
pub struct AppBuilder {
    config: Arc<RuntimeConfig>,
    store_keys: Vec<StoreKey>,
    interface_registry: SharedInterfaceRegistry,
    codec: Codec,
    amino: SharedLegacyAmino,
    msg_router: SharedMsgRouterBuilder,
    state: Arc<AppState>,
    finalized: Option<Finalized>,
}

impl AppBuilder {
    pub fn new(
        config: Arc<RuntimeConfig>,
        interface_registry: SharedInterfaceRegistry,
        amino: SharedLegacyAmino,
        msg_router: SharedMsgRouterBuilder,
    ) -> Self {
        Self {
            config,
            store_keys: Vec::new(),
            codec: Codec::new(Arc::clone(&interface_registry)),
            interface_registry,
            amino,
            msg_router,
            state: Arc::new(AppState::default()),
            finalized: None,
        }
    }

    pub fn into_shared(self) -> SharedAppBuilder {
        Arc::new(RwLock::new(self))
    }

    /// Append a key. Never deduplicates.
    pub fn register_store_key(&mut self, key: StoreKey) {
        self.store_keys.push(key);
    }

    pub fn store_keys(&self) -> &[StoreKey] {
        &self.store_keys
    }

    pub fn config(&self) -> &Arc<RuntimeConfig> {
        &self.config
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn interface_registry(&self) -> &SharedInterfaceRegistry {
        &self.interface_registry
    }

    pub fn legacy_amino(&self) -> &SharedLegacyAmino {
        &self.amino
    }

    pub fn msg_router_builder(&self) -> &SharedMsgRouterBuilder {
        &self.msg_router
    }

    pub fn genesis_tx_handler(&self) -> Arc<dyn GenesisTxHandler> {
        Arc::new(AppView::new(Arc::clone(&self.state)))
    }

    pub fn app_version_modifier(&self) -> Arc<dyn AppVersionModifier> {
        Arc::new(AppView::new(Arc::clone(&self.state)))
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// Freeze the App's cross-cutting fields.
    ///
    /// Rejects duplicate store key names, then seals the interface registry
    /// and the amino codec.
    pub fn finalize(
        &mut self,
        module_manager: ModuleManager,
        logger: Logger,
        store: Arc<dyn Store>,
    ) -> Result<(), CompositionError> {
        if self.finalized.is_some() {
            return Err(CompositionError::AlreadyFinalized);
        }

        let mut seen = BTreeSet::new();
        for key in &self.store_keys {
            if !seen.insert(key.name()) {
                return Err(CompositionError::DuplicateStoreKey(key.name().to_string()));
            }
        }

        self.interface_registry.write().seal();
        self.amino.write().seal();

        info!(
            app = %self.config.app.name,
            modules = module_manager.len(),
            store_keys = self.store_keys.len(),
            "App builder finalized"
        );

        self.finalized = Some(Finalized {
            module_manager,
            logger,
            store,
        });
        Ok(())
    }

    /// Consume the builder. Only valid after `finalize`.
    pub fn build(self) -> Result<App, CompositionError> {
        let Finalized {
            module_manager,
            logger,
            store,
        } = self.finalized.ok_or(CompositionError::NotFinalized)?;

        let msg_router = self.msg_router.read().build();

        Ok(App {
            config: self.config,
            store_keys: self.store_keys,
            interface_registry: self.interface_registry,
            codec: self.codec,
            amino: self.amino,
            msg_router,
            query_router: Capability::Unavailable("query router"),
            module_manager,
            logger,
            store,
            state: self.state,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(config: RuntimeConfig) -> Self {
        use app_types::codec::{InterfaceRegistry, LegacyAmino, SigningOptions};
        use app_types::router::MsgRouterBuilder;
        use app_types::Bech32Codec;

        let options = SigningOptions::new(
            Arc::new(Bech32Codec::new("cosmos").unwrap()),
            Arc::new(Bech32Codec::new("cosmosvaloper").unwrap()),
        );
        Self::new(
            Arc::new(config),
            InterfaceRegistry::new(options).into_shared(),
            LegacyAmino::new().into_shared(),
            MsgRouterBuilder::new().into_shared(),
        )
    }
}

impl std::fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppBuilder")
            .field("app", &self.config.app.name)
            .field("store_keys", &self.store_keys)
            .field("finalized", &self.finalized.is_some())
            .finish()
    }
}
