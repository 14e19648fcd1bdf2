//! Module construction inputs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use app_types::router::SharedMsgRouterBuilder;
use app_types::{AppModule, Environment, Logger, ModuleError};

use crate::address::AddressCodecSet;

/// Everything a module factory gets from the runtime.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub name: String,
    pub environment: Environment,
    pub address_codecs: AddressCodecSet,
    pub msg_router: SharedMsgRouterBuilder,
    pub logger: Logger,
}

/// Builds one module from its context.
pub type ModuleFactory =
    Arc<dyn Fn(ModuleContext) -> Result<Arc<dyn AppModule>, ModuleError> + Send + Sync>;

/// Constructed modules keyed by name.
pub type ModuleSet = BTreeMap<String, Arc<dyn AppModule>>;

/// Module factories keyed by module name, supplied by the app's entry point.
#[derive(Clone, Default)]
pub struct ModuleFactories {
    factories: BTreeMap<String, ModuleFactory>,
}

impl ModuleFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory. A later factory for the same name replaces the earlier.
    pub fn with_factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(ModuleContext) -> Result<Arc<dyn AppModule>, ModuleError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Add an already constructed module.
    pub fn with_module(self, name: impl Into<String>, module: Arc<dyn AppModule>) -> Self {
        self.with_factory(name, move |_| Ok(Arc::clone(&module)))
    }

    pub fn get(&self, name: &str) -> Option<&ModuleFactory> {
        self.factories.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ModuleFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
