//! # Module Contract
//!
//! A module is an independently developed unit that may expose any subset
//! of three registration hooks:
//!
//! | Hook                  | Trait            | Driven by                              |
//! |-----------------------|------------------|----------------------------------------|
//! | interfaces            | `HasInterfaces`  | `ModuleManager::register_interfaces`   |
//! | legacy amino codec    | `HasAminoCodec`  | `ModuleManager::register_legacy_amino` |
//! | gRPC-style services   | `HasServices`    | `ModuleManager::register_services`     |
//!
//! The capability set is read once when the module manager is constructed
//! and recorded as `Capabilities`.

use std::any::Any as StdAny;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::{InterfaceRegistry, LegacyAmino};
use crate::errors::{RegistryError, ServiceError};

/// Registers message implementations into the interface registry.
pub trait HasInterfaces {
    fn register_interfaces(&self, registry: &mut InterfaceRegistry) -> Result<(), RegistryError>;
}

/// Registers amino names into the legacy codec.
pub trait HasAminoCodec {
    fn register_legacy_amino_codec(&self, amino: &mut LegacyAmino) -> Result<(), RegistryError>;
}

/// Exposes services for the transport layer.
pub trait HasServices {
    /// Descriptors of every service this module registers.
    fn service_descriptors(&self) -> Vec<ServiceDescriptor>;

    fn register_services(&self, registrar: &mut dyn ServiceRegistrar) -> Result<(), ServiceError>;
}

/// A module as seen by the module manager.
///
/// Each accessor returns `Some` when the module implements that hook.
pub trait AppModule: Send + Sync {
    fn as_interface_registrar(&self) -> Option<&dyn HasInterfaces> {
        None
    }

    fn as_amino_registrar(&self) -> Option<&dyn HasAminoCodec> {
        None
    }

    fn as_service_provider(&self) -> Option<&dyn HasServices> {
        None
    }
}

/// Hooks a module implements, recorded once at manager construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub interfaces: bool,
    pub legacy_amino: bool,
    pub services: bool,
}

impl Capabilities {
    pub fn of(module: &dyn AppModule) -> Self {
        Self {
            interfaces: module.as_interface_registrar().is_some(),
            legacy_amino: module.as_amino_registrar().is_some(),
            services: module.as_service_provider().is_some(),
        }
    }
}

// =============================================================================
// SERVICES
// =============================================================================

/// Whether a service handles transactions or queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    Msg,
    Query,
}

/// One RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub request_type_url: String,
    /// Empty when the method does not declare a response type.
    pub response_type_url: String,
}

/// A service and the annotations the runtime checks at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub kind: ServiceKind,
    /// The msg-service annotation. Required on every `Msg` service.
    pub msg_service_annotated: bool,
    pub methods: Vec<MethodDescriptor>,
}

/// Type-erased service implementation.
pub type ServiceServer = Arc<dyn StdAny + Send + Sync>;

/// Accepts service registrations from modules and the runtime.
pub trait ServiceRegistrar {
    fn register_service(
        &mut self,
        descriptor: ServiceDescriptor,
        server: ServiceServer,
    ) -> Result<(), ServiceError>;
}

/// Registrar that collects services by name.
#[derive(Default)]
pub struct ServiceTable {
    services: BTreeMap<String, (ServiceDescriptor, ServiceServer)>,
}

impl ServiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name).map(|(descriptor, _)| descriptor)
    }

    /// Server registered under `name`, downcast to its concrete type.
    pub fn server<T: StdAny + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let (_, server) = self.services.get(name)?;
        Arc::clone(server).downcast::<T>().ok()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceRegistrar for ServiceTable {
    fn register_service(
        &mut self,
        descriptor: ServiceDescriptor,
        server: ServiceServer,
    ) -> Result<(), ServiceError> {
        if self.services.contains_key(&descriptor.name) {
            return Err(ServiceError::DuplicateService(descriptor.name));
        }
        self.services
            .insert(descriptor.name.clone(), (descriptor, server));
        Ok(())
    }
}
