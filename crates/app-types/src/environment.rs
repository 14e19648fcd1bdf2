//! # Module Environment
//!
//! The bundle of service handles handed to exactly one module: logger,
//! persistent-store accessor, memory-store accessor, event emission and gas
//! accounting. Store accessors are scoped to the module's own store keys, so
//! two modules can never address each other's namespace.
//!
//! Branch and header services are not wired by this runtime. They are
//! carried as `Capability::Unavailable` so modules can detect their absence.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{EnvironmentError, GasError, StoreError};
use crate::logger::Logger;
use crate::store::{KvStore, StoreKey, WriterMap};

// =============================================================================
// CAPABILITY SLOTS
// =============================================================================

/// A service that may or may not be wired.
#[derive(Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable(&'static str),
}

impl<T> Capability<T> {
    /// Access the service or report which one is missing.
    pub fn get(&self) -> Result<&T, EnvironmentError> {
        match self {
            Self::Available(service) => Ok(service),
            Self::Unavailable(name) => Err(EnvironmentError::Unavailable(name)),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl<T> std::fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => write!(f, "Available"),
            Self::Unavailable(name) => write!(f, "Unavailable({name})"),
        }
    }
}

/// Runs a closure against a branch of state, committing only on success.
pub trait BranchService: Send + Sync {
    fn execute(
        &self,
        state: &mut dyn WriterMap,
        f: &mut dyn FnMut(&mut dyn WriterMap) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;
}

/// Block header currently being executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub height: u64,
    pub hash: Vec<u8>,
    pub time_unix_secs: u64,
    pub chain_id: String,
}

/// Provides the header of the block being executed.
pub trait HeaderService: Send + Sync {
    fn header_info(&self) -> HeaderInfo;
}

// =============================================================================
// STORE SERVICES
// =============================================================================

/// Opens the module's persistent namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvStoreService {
    actor: Vec<u8>,
}

impl KvStoreService {
    pub fn new(key: &StoreKey) -> Self {
        Self { actor: key.actor() }
    }

    pub fn actor(&self) -> &[u8] {
        &self.actor
    }

    /// Writer for this module's namespace within `state`.
    pub fn open<'a>(
        &self,
        state: &'a mut dyn WriterMap,
    ) -> Result<&'a mut dyn KvStore, StoreError> {
        state.writer(&self.actor)
    }
}

/// Opens the module's in-memory namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStoreService {
    actor: Vec<u8>,
}

impl MemoryStoreService {
    pub fn new(key: &StoreKey) -> Self {
        Self { actor: key.actor() }
    }

    pub fn actor(&self) -> &[u8] {
        &self.actor
    }

    pub fn open<'a>(
        &self,
        state: &'a mut dyn WriterMap,
    ) -> Result<&'a mut dyn KvStore, StoreError> {
        state.writer(&self.actor)
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Event emitted by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub module: String,
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

/// Destination for emitted events. Supplied by the execution engine.
pub trait EventSink {
    fn push(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn push(&mut self, event: Event) {
        Vec::push(self, event);
    }
}

/// Emits events stamped with the owning module's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventService {
    module: String,
}

impl EventService {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }

    pub fn emit(
        &self,
        sink: &mut dyn EventSink,
        kind: impl Into<String>,
        attributes: Vec<(String, String)>,
    ) {
        sink.push(Event {
            module: self.module.clone(),
            kind: kind.into(),
            attributes,
        });
    }
}

// =============================================================================
// GAS
// =============================================================================

/// Bounded gas meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// Consume `amount`; on failure the meter is left unchanged.
    pub fn consume(&mut self, amount: u64, descriptor: &str) -> Result<(), GasError> {
        let required = self.consumed.saturating_add(amount);
        if required > self.limit {
            return Err(GasError::OutOfGas {
                limit: self.limit,
                required,
                descriptor: descriptor.to_string(),
            });
        }
        self.consumed = required;
        Ok(())
    }

    pub fn refund(&mut self, amount: u64) {
        self.consumed = self.consumed.saturating_sub(amount);
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.consumed
    }
}

/// Creates gas meters for module execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasService;

impl GasService {
    pub fn new() -> Self {
        Self
    }

    pub fn meter(&self, limit: u64) -> GasMeter {
        GasMeter::new(limit)
    }
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Services scoped to one module.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Shared across all modules.
    pub logger: Logger,
    pub kv_store_service: KvStoreService,
    pub memory_store_service: MemoryStoreService,
    pub event_service: EventService,
    pub gas_service: GasService,
    pub branch_service: Capability<Arc<dyn BranchService>>,
    pub header_service: Capability<Arc<dyn HeaderService>>,
}
