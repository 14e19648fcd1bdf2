//! # Store Key Allocation
//!
//! Every module gets one persistent key and one memory key:
//!
//! | Kind       | Name                                   | Overridable |
//! |------------|----------------------------------------|-------------|
//! | persistent | `override_store_keys` entry, or module | yes         |
//! | memory     | `memory:<module>`                      | no          |
//!
//! Allocation appends to the App's key list and never deduplicates, so each
//! module is allocated at most once per kind. Name collisions between
//! modules are caught when the App is finalized.

use app_types::StoreKey;
use tracing::debug;

use crate::app::AppBuilder;
use crate::config::RuntimeConfig;

/// Persistent key name for `module`, honoring overrides.
pub fn persistent_key_name(config: &RuntimeConfig, module: &str) -> String {
    match config.store_key_override(module) {
        Some(cfg) => cfg.kv_store_key.clone(),
        None => module.to_string(),
    }
}

/// Memory key name for `module`.
pub fn memory_key_name(module: &str) -> String {
    format!("memory:{module}")
}

/// Allocate and record the persistent key for `module`.
pub fn allocate_persistent_key(
    builder: &mut AppBuilder,
    config: &RuntimeConfig,
    module: &str,
) -> StoreKey {
    let key = StoreKey::persistent(persistent_key_name(config, module));
    debug!(module, key = %key, "Allocated persistent store key");
    builder.register_store_key(key.clone());
    key
}

/// Allocate and record the memory key for `module`.
pub fn allocate_memory_key(builder: &mut AppBuilder, module: &str) -> StoreKey {
    let key = StoreKey::memory(memory_key_name(module));
    debug!(module, key = %key, "Allocated memory store key");
    builder.register_store_key(key.clone());
    key
}
