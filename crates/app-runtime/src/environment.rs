//! # Environment Builder
//!
//! Builds the per-module service bundle. Store services are scoped to the
//! module's own keys; the logger is the only handle shared between modules.
//! Branch and header services are not wired by the runtime and are handed
//! out as `Capability::Unavailable`.

use app_types::environment::{KvStoreService, MemoryStoreService};
use app_types::{Capability, Environment, EventService, GasService, Logger, StoreKey};
use tracing::debug;

use crate::app::AppBuilder;
use crate::config::RuntimeConfig;
use crate::store_keys::{allocate_memory_key, allocate_persistent_key};

/// A module's environment together with the keys it was built from.
#[derive(Debug, Clone)]
pub struct ModuleEnvironment {
    pub environment: Environment,
    pub kv_store_key: StoreKey,
    pub memory_store_key: StoreKey,
}

/// Assemble an environment from already allocated keys.
pub fn build_environment(
    module: &str,
    kv_store_key: &StoreKey,
    memory_store_key: &StoreKey,
    logger: &Logger,
) -> Environment {
    Environment {
        logger: logger.clone(),
        kv_store_service: KvStoreService::new(kv_store_key),
        memory_store_service: MemoryStoreService::new(memory_store_key),
        event_service: EventService::new(module),
        gas_service: GasService::new(),
        branch_service: Capability::Unavailable("branch service"),
        header_service: Capability::Unavailable("header service"),
    }
}

/// Allocate both keys for `module` on the builder and build its environment.
pub fn provide_environment(
    builder: &mut AppBuilder,
    config: &RuntimeConfig,
    module: &str,
    logger: &Logger,
) -> ModuleEnvironment {
    let kv_store_key = allocate_persistent_key(builder, config, module);
    let memory_store_key = allocate_memory_key(builder, module);
    debug!(module, kv = %kv_store_key, memory = %memory_store_key, "Built module environment");

    ModuleEnvironment {
        environment: build_environment(module, &kv_store_key, &memory_store_key, logger),
        kv_store_key,
        memory_store_key,
    }
}
