//! # Module Manager
//!
//! Fixed set of modules keyed by name. Iteration is in name order, so
//! registration hooks run in the same order for the same module set.
//! Capabilities are read once at construction; registration only visits
//! modules whose flag is set.

use std::collections::BTreeMap;
use std::sync::Arc;

use app_types::codec::{InterfaceRegistry, LegacyAmino};
use app_types::module::{ServiceDescriptor, ServiceRegistrar};
use app_types::{AppModule, Capabilities, Logger, ModuleError};
use tracing::debug;

use crate::config::{RuntimeConfig, RUNTIME_MODULE};

#[derive(Clone)]
struct ManagedModule {
    module: Arc<dyn AppModule>,
    capabilities: Capabilities,
}

/// Every module of one App.
#[derive(Clone)]
pub struct ModuleManager {
    modules: BTreeMap<String, ManagedModule>,
    logger: Logger,
}

impl ModuleManager {
    /// Build the manager from the supplied modules.
    ///
    /// Every supplied module must be declared in the config, and every
    /// declared module other than the runtime must be supplied.
    pub fn new(
        modules: BTreeMap<String, Arc<dyn AppModule>>,
        config: &RuntimeConfig,
        logger: Logger,
    ) -> Result<Self, ModuleError> {
        for name in modules.keys() {
            if name == RUNTIME_MODULE || !config.is_declared(name) {
                return Err(ModuleError::Undeclared(name.clone()));
            }
        }
        if let Some(missing) = config.declared_modules().find(|name| !modules.contains_key(*name)) {
            return Err(ModuleError::NotSupplied(missing.to_string()));
        }

        let modules = modules
            .into_iter()
            .map(|(name, module)| {
                let capabilities = Capabilities::of(module.as_ref());
                debug!(module = %name, ?capabilities, "Module registered with manager");
                (name, ManagedModule { module, capabilities })
            })
            .collect();

        Ok(Self { modules, logger })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module names in iteration order.
    pub fn names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn module(&self, name: &str) -> Option<&Arc<dyn AppModule>> {
        self.modules.get(name).map(|entry| &entry.module)
    }

    pub fn capabilities(&self, name: &str) -> Option<Capabilities> {
        self.modules.get(name).map(|entry| entry.capabilities)
    }

    /// All modules in iteration order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &Arc<dyn AppModule>)> {
        self.modules
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.module))
    }

    pub fn register_interfaces(&self, registry: &mut InterfaceRegistry) -> Result<(), ModuleError> {
        for (name, entry) in &self.modules {
            if !entry.capabilities.interfaces {
                continue;
            }
            if let Some(hook) = entry.module.as_interface_registrar() {
                hook.register_interfaces(registry)
                    .map_err(|source| ModuleError::Registration {
                        module: name.clone(),
                        source,
                    })?;
                self.logger.debug(&format!("Registered interfaces for {name}"));
            }
        }
        Ok(())
    }

    pub fn register_legacy_amino(&self, amino: &mut LegacyAmino) -> Result<(), ModuleError> {
        for (name, entry) in &self.modules {
            if !entry.capabilities.legacy_amino {
                continue;
            }
            if let Some(hook) = entry.module.as_amino_registrar() {
                hook.register_legacy_amino_codec(amino)
                    .map_err(|source| ModuleError::Registration {
                        module: name.clone(),
                        source,
                    })?;
                self.logger.debug(&format!("Registered amino codec for {name}"));
            }
        }
        Ok(())
    }

    pub fn register_services(
        &self,
        registrar: &mut dyn ServiceRegistrar,
    ) -> Result<(), ModuleError> {
        for (name, entry) in &self.modules {
            if !entry.capabilities.services {
                continue;
            }
            if let Some(hook) = entry.module.as_service_provider() {
                hook.register_services(registrar)
                    .map_err(|source| ModuleError::Services {
                        module: name.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// `(module, descriptor)` for every service any module exposes.
    pub fn service_descriptors(&self) -> Vec<(String, ServiceDescriptor)> {
        self.modules
            .iter()
            .filter(|(_, entry)| entry.capabilities.services)
            .filter_map(|(name, entry)| {
                entry
                    .module
                    .as_service_provider()
                    .map(|hook| (name, hook.service_descriptors()))
            })
            .flat_map(|(name, descriptors)| {
                descriptors
                    .into_iter()
                    .map(move |descriptor| (name.clone(), descriptor))
            })
            .collect()
    }
}

impl std::fmt::Debug for ModuleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.modules
                    .iter()
                    .map(|(name, entry)| (name, entry.capabilities)),
            )
            .finish()
    }
}
