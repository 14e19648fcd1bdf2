//! # Runtime Provider Set
//!
//! Registers the runtime's providers and setup step on a [`Composition`]
//! and drives it to a finished [`App`].
//!
//! ```text
//! config ──► address_codecs ──► interface_registry ──► app_builder
//!                   │                                      │
//!                   └──────────► modules ◄─────────────────┤
//!                                   │                      │
//!                             module_manager   genesis_tx_handler,
//!                                   │          app_version_modifier
//!                                   ▼
//!                         setup_app_builder (invoke)
//! ```
//!
//! Nothing is registered at load time. The app's entry point calls
//! [`register`] (or [`compose`]) explicitly.

pub mod modules;

use std::fmt;
use std::sync::Arc;

use app_types::codec::{CustomGetSigner, LegacyAmino, SharedInterfaceRegistry, SharedLegacyAmino};
use app_types::router::{MsgRouterBuilder, SharedMsgRouterBuilder};
use app_types::store::Store;
use app_telemetry::log_event;
use app_types::{Logger, ModuleError};
use tracing::info;

pub use modules::{ModuleContext, ModuleFactories, ModuleFactory, ModuleSet};

use crate::address::{resolve_address_codecs, AddressCodecOverrides, AddressCodecSet};
use crate::app::{App, AppBuilder, AppVersionModifier, GenesisTxHandler, SharedAppBuilder};
use crate::codec::{
    provide_interface_registry, register_std_amino, register_std_interfaces,
    validate_service_annotations,
};
use crate::composition::{Composition, Step};
use crate::config::{RuntimeConfig, RUNTIME_MODULE};
use crate::environment::provide_environment;
use crate::error::CompositionError;
use crate::module_manager::ModuleManager;
use crate::store::{provide_root_store, RootStore};

/// Optional inputs to [`compose`].
#[derive(Default)]
pub struct AppInputs {
    pub address_codec_overrides: Option<AddressCodecOverrides>,
    pub custom_signers: Vec<CustomGetSigner>,
    pub root_store: Option<Arc<dyn RootStore>>,
    /// Defaults to a logger named after the app.
    pub logger: Option<Logger>,
}

/// A finished App plus the capabilities handed to the surrounding system.
pub struct ComposedApp {
    pub app: App,
    pub genesis_tx_handler: Arc<dyn GenesisTxHandler>,
    pub app_version_modifier: Arc<dyn AppVersionModifier>,
}

impl fmt::Debug for ComposedApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedApp").field("app", &self.app).finish()
    }
}

/// Register the runtime providers and the setup step.
///
/// Expects `Arc<RuntimeConfig>`, `ModuleFactories` and `Logger` to be
/// supplied. `AddressCodecOverrides`, `Vec<CustomGetSigner>` and
/// `Arc<dyn RootStore>` are optional.
pub fn register(composition: &mut Composition) {
    composition
        .provide(
            Step::new("address_codecs", |c| {
                let config = c.resolve::<Arc<RuntimeConfig>>()?;
                let overrides = c.optional::<AddressCodecOverrides>().unwrap_or_default();
                let codecs = resolve_address_codecs(&config, &overrides)?;
                c.insert(codecs);
                Ok(())
            })
            .needs::<Arc<RuntimeConfig>>()
            .wants::<AddressCodecOverrides>()
            .yields::<AddressCodecSet>(),
        )
        .provide(
            Step::new("interface_registry", |c| {
                let codecs = c.resolve::<AddressCodecSet>()?;
                let signers = c.optional::<Vec<CustomGetSigner>>().unwrap_or_default();
                let registry = provide_interface_registry(&codecs, &signers)?;
                c.insert(registry);
                Ok(())
            })
            .needs::<AddressCodecSet>()
            .wants::<Vec<CustomGetSigner>>()
            .yields::<SharedInterfaceRegistry>(),
        )
        .provide(
            Step::new("app_builder", |c| {
                let config = c.resolve::<Arc<RuntimeConfig>>()?;
                let registry = c.resolve::<SharedInterfaceRegistry>()?;
                register_std_interfaces(&mut registry.write())?;

                let mut amino = LegacyAmino::new();
                register_std_amino(&mut amino)?;
                let amino = amino.into_shared();
                let msg_router = MsgRouterBuilder::new().into_shared();

                let builder = AppBuilder::new(
                    config,
                    registry,
                    Arc::clone(&amino),
                    Arc::clone(&msg_router),
                );
                c.insert(builder.codec().clone());
                c.insert(amino);
                c.insert(msg_router);
                c.insert(builder.into_shared());
                Ok(())
            })
            .needs::<Arc<RuntimeConfig>>()
            .needs::<SharedInterfaceRegistry>()
            .yields::<app_types::codec::Codec>()
            .yields::<SharedLegacyAmino>()
            .yields::<SharedMsgRouterBuilder>()
            .yields::<SharedAppBuilder>(),
        )
        .provide(
            Step::new("root_store", |c| {
                let store = provide_root_store(c.optional::<Arc<dyn RootStore>>());
                c.insert(store);
                Ok(())
            })
            .wants::<Arc<dyn RootStore>>()
            .yields::<Arc<dyn Store>>(),
        )
        .provide(
            Step::new("modules", provide_modules)
                .needs::<Arc<RuntimeConfig>>()
                .needs::<ModuleFactories>()
                .needs::<SharedAppBuilder>()
                .needs::<SharedMsgRouterBuilder>()
                .needs::<AddressCodecSet>()
                .needs::<Logger>()
                .yields::<ModuleSet>(),
        )
        .provide(
            Step::new("module_manager", |c| {
                let modules = c.resolve::<ModuleSet>()?;
                let config = c.resolve::<Arc<RuntimeConfig>>()?;
                let logger = c.resolve::<Logger>()?;
                let manager = ModuleManager::new(modules, &config, logger)?;
                c.insert(manager);
                Ok(())
            })
            .needs::<ModuleSet>()
            .needs::<Arc<RuntimeConfig>>()
            .needs::<Logger>()
            .yields::<ModuleManager>(),
        )
        .provide(
            Step::new("genesis_tx_handler", |c| {
                let handler = c.resolve::<SharedAppBuilder>()?.read().genesis_tx_handler();
                c.insert(handler);
                Ok(())
            })
            .needs::<SharedAppBuilder>()
            .yields::<Arc<dyn GenesisTxHandler>>(),
        )
        .provide(
            Step::new("app_version_modifier", |c| {
                let modifier = c.resolve::<SharedAppBuilder>()?.read().app_version_modifier();
                c.insert(modifier);
                Ok(())
            })
            .needs::<SharedAppBuilder>()
            .yields::<Arc<dyn AppVersionModifier>>(),
        )
        .invoke(
            Step::new("setup_app_builder", setup_app_builder)
                .needs::<SharedAppBuilder>()
                .needs::<ModuleManager>()
                .needs::<SharedInterfaceRegistry>()
                .needs::<SharedLegacyAmino>()
                .needs::<Logger>()
                .needs::<Arc<dyn Store>>(),
        );
}

/// Build every declared module, allocating its keys and environment first.
fn provide_modules(c: &mut crate::composition::Container) -> Result<(), CompositionError> {
    let config = c.resolve::<Arc<RuntimeConfig>>()?;
    let factories = c.resolve::<ModuleFactories>()?;
    let builder = c.resolve::<SharedAppBuilder>()?;
    let msg_router = c.resolve::<SharedMsgRouterBuilder>()?;
    let codecs = c.resolve::<AddressCodecSet>()?;
    let logger = c.resolve::<Logger>()?;

    if let Some(name) = factories
        .names()
        .find(|name| *name == RUNTIME_MODULE || !config.is_declared(name))
    {
        return Err(ModuleError::Undeclared(name.to_string()).into());
    }

    let mut modules = ModuleSet::new();
    for name in config.declared_modules() {
        let factory = factories
            .get(name)
            .ok_or_else(|| ModuleError::NotSupplied(name.to_string()))?;
        let env = provide_environment(&mut builder.write(), &config, name, &logger);

        let module = factory(ModuleContext {
            name: name.to_string(),
            environment: env.environment,
            address_codecs: codecs.clone(),
            msg_router: Arc::clone(&msg_router),
            logger: logger.clone(),
        })?;
        info!(module = name, "[Runtime] Module constructed");
        modules.insert(name.to_string(), module);
    }

    c.insert(modules);
    Ok(())
}

/// Register module interfaces and codecs, check annotations, then freeze
/// the builder.
fn setup_app_builder(c: &mut crate::composition::Container) -> Result<(), CompositionError> {
    let builder = c.resolve::<SharedAppBuilder>()?;
    let manager = c.resolve::<ModuleManager>()?;
    let registry = c.resolve::<SharedInterfaceRegistry>()?;
    let amino = c.resolve::<SharedLegacyAmino>()?;
    let logger = c.resolve::<Logger>()?;
    let store = c.resolve::<Arc<dyn Store>>()?;

    manager.register_interfaces(&mut registry.write())?;
    manager.register_legacy_amino(&mut amino.write())?;
    registry.read().signing_context().validate()?;

    let violations = validate_service_annotations(&manager.service_descriptors(), &registry.read());
    if !violations.is_empty() {
        log_event!(
            warn,
            RUNTIME_MODULE,
            "[Runtime] Service annotation problems found, continuing",
            count = violations.len()
        );
    }

    builder.write().finalize(manager, logger, store)?;
    Ok(())
}

/// Compose an App from configuration and module factories.
///
/// Aborts on the first error; no partially built App is returned.
pub fn compose(
    config: RuntimeConfig,
    factories: ModuleFactories,
    inputs: AppInputs,
) -> Result<ComposedApp, CompositionError> {
    config.validate()?;
    info!(
        app = %config.app.name,
        modules = config.app.modules.len(),
        "[Runtime] Composing app"
    );

    let AppInputs {
        address_codec_overrides,
        custom_signers,
        root_store,
        logger,
    } = inputs;
    let logger = logger.unwrap_or_else(|| Logger::new(&config.app.name));

    let mut composition = Composition::new();
    composition
        .supply(Arc::new(config))
        .supply(factories)
        .supply(logger);
    if let Some(overrides) = address_codec_overrides {
        composition.supply(overrides);
    }
    if !custom_signers.is_empty() {
        composition.supply(custom_signers);
    }
    if let Some(root_store) = root_store {
        composition.supply(root_store);
    }

    register(&mut composition);
    composition
        .require::<Arc<dyn GenesisTxHandler>>()
        .require::<Arc<dyn AppVersionModifier>>();

    let mut container = composition.run()?;
    let genesis_tx_handler = container.take::<Arc<dyn GenesisTxHandler>>()?;
    let app_version_modifier = container.take::<Arc<dyn AppVersionModifier>>()?;
    let builder = container.take::<SharedAppBuilder>()?;
    drop(container);

    let builder = Arc::try_unwrap(builder)
        .map_err(|_| CompositionError::BuilderInUse)?
        .into_inner();
    let app = builder.build()?;

    log_event!(
        info,
        RUNTIME_MODULE,
        "[Runtime] App composed",
        app = %app.name(),
        modules = app.module_manager().len(),
        store_keys = app.store_keys().len()
    );

    Ok(ComposedApp {
        app,
        genesis_tx_handler,
        app_version_modifier,
    })
}
