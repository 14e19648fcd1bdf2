//! Composition errors.

use app_types::{ModuleError, RegistryError, ServiceError, SigningError, StoreError};
use thiserror::Error;

use crate::config::ConfigError;

/// How an error should be treated by the process driving composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operator configuration is wrong; startup cannot proceed.
    Fatal,
    /// Returned to the caller, who decides whether to retry with other inputs.
    Recoverable,
}

/// Anything that aborts composition. No partial App is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Signing context is inconsistent.
    #[error("Signing context validation failed: {0}")]
    Signing(#[from] SigningError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Module error: {0}")]
    Module(#[from] ModuleError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Two modules resolved to the same store key name.
    #[error("Store key {0} is allocated more than once")]
    DuplicateStoreKey(String),

    /// Two steps yield the same type.
    #[error("Both {first} and {second} provide {dependency}")]
    DuplicateProvider {
        dependency: &'static str,
        first: String,
        second: String,
    },

    /// A required input has no provider.
    #[error("Step {step} needs {dependency}, which nothing provides")]
    MissingDependency {
        step: String,
        dependency: &'static str,
    },

    /// Steps that depend on each other in a loop.
    #[error("Dependency cycle between steps: {}", .0.join(", "))]
    Cycle(Vec<String>),

    /// A provider returned without inserting what it declared.
    #[error("Step {step} did not provide {dependency}")]
    ProviderContract {
        step: String,
        dependency: &'static str,
    },

    #[error("App builder has not been finalized")]
    NotFinalized,

    #[error("App builder is already finalized")]
    AlreadyFinalized,

    /// Another handle to the builder is still alive at hand-off.
    #[error("App builder is still referenced elsewhere")]
    BuilderInUse,
}

impl CompositionError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Config(_) | Self::DuplicateStoreKey(_) => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
