//! # Runtime Introspection Services
//!
//! Two read-only query services the runtime registers next to the modules'
//! own services:
//!
//! - **autocli**: per-module tx and query service names, for generating CLIs
//! - **reflection**: registered interfaces and their implementations

use std::collections::BTreeMap;
use std::sync::Arc;

use app_types::codec::InterfaceRegistry;
use app_types::module::{MethodDescriptor, ServiceDescriptor, ServiceKind, ServiceRegistrar};
use app_types::ServiceError;
use serde::Serialize;

use crate::module_manager::ModuleManager;

pub const AUTOCLI_QUERY_SERVICE: &str = "autocli.v1.Query";
pub const REFLECTION_SERVICE: &str = "reflection.v1.ReflectionService";

/// CLI metadata for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleOptions {
    pub tx_services: Vec<String>,
    pub query_services: Vec<String>,
}

/// Serves CLI metadata for every module in the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCliQueryService {
    module_options: BTreeMap<String, ModuleOptions>,
}

impl AutoCliQueryService {
    pub fn new(manager: &ModuleManager) -> Self {
        let mut module_options: BTreeMap<String, ModuleOptions> = manager
            .names()
            .into_iter()
            .map(|name| (name.to_string(), ModuleOptions::default()))
            .collect();

        for (module, descriptor) in manager.service_descriptors() {
            let options = module_options.entry(module).or_default();
            match descriptor.kind {
                ServiceKind::Msg => options.tx_services.push(descriptor.name),
                ServiceKind::Query => options.query_services.push(descriptor.name),
            }
        }

        Self { module_options }
    }

    /// Options keyed by module name.
    pub fn app_options(&self) -> &BTreeMap<String, ModuleOptions> {
        &self.module_options
    }

    pub fn descriptor() -> ServiceDescriptor {
        query_descriptor(
            AUTOCLI_QUERY_SERVICE,
            "AppOptions",
            "/autocli.v1.AppOptionsRequest",
            "/autocli.v1.AppOptionsResponse",
        )
    }
}

/// Describes every interface and implementation in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionService {
    interfaces: BTreeMap<String, Vec<String>>,
}

impl ReflectionService {
    pub fn new(registry: &InterfaceRegistry) -> Self {
        let interfaces = registry
            .list_interfaces()
            .into_iter()
            .map(|name| {
                let implementations = registry.list_implementations(&name);
                (name, implementations)
            })
            .collect();
        Self { interfaces }
    }

    pub fn interfaces(&self) -> Vec<&str> {
        self.interfaces.keys().map(String::as_str).collect()
    }

    pub fn implementations(&self, interface: &str) -> &[String] {
        self.interfaces
            .get(interface)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn descriptor() -> ServiceDescriptor {
        query_descriptor(
            REFLECTION_SERVICE,
            "FileDescriptors",
            "/reflection.v1.FileDescriptorsRequest",
            "/reflection.v1.FileDescriptorsResponse",
        )
    }
}

fn query_descriptor(
    service: &str,
    method: &str,
    request: &str,
    response: &str,
) -> ServiceDescriptor {
    ServiceDescriptor {
        name: service.to_string(),
        kind: ServiceKind::Query,
        msg_service_annotated: false,
        methods: vec![MethodDescriptor {
            name: method.to_string(),
            request_type_url: request.to_string(),
            response_type_url: response.to_string(),
        }],
    }
}

/// Register the autocli and reflection services.
pub fn register_runtime_services(
    registrar: &mut dyn ServiceRegistrar,
    manager: &ModuleManager,
    registry: &InterfaceRegistry,
) -> Result<(), ServiceError> {
    registrar.register_service(
        AutoCliQueryService::descriptor(),
        Arc::new(AutoCliQueryService::new(manager)),
    )?;
    registrar.register_service(
        ReflectionService::descriptor(),
        Arc::new(ReflectionService::new(registry)),
    )?;
    Ok(())
}
