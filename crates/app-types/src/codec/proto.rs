//! Codec over the shared interface registry.
//!
//! Message bodies are JSON-encoded; the envelope format is what matters to
//! the rest of the runtime, not the body encoding.

use crate::codec::message::{Any, Message, TypedMessage};
use crate::codec::registry::SharedInterfaceRegistry;
use crate::errors::RegistryError;

/// Marshals typed messages and resolves envelopes through the registry.
#[derive(Clone)]
pub struct Codec {
    registry: SharedInterfaceRegistry,
}

impl Codec {
    pub fn new(registry: SharedInterfaceRegistry) -> Self {
        Self { registry }
    }

    pub fn interface_registry(&self) -> &SharedInterfaceRegistry {
        &self.registry
    }

    pub fn marshal<M: TypedMessage>(&self, msg: &M) -> Result<Vec<u8>, RegistryError> {
        serde_json::to_vec(msg).map_err(|e| RegistryError::Codec {
            type_url: M::TYPE_URL.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn unmarshal<M: TypedMessage>(&self, bytes: &[u8]) -> Result<M, RegistryError> {
        serde_json::from_slice(bytes).map_err(|e| RegistryError::Codec {
            type_url: M::TYPE_URL.to_string(),
            reason: e.to_string(),
        })
    }

    /// Wrap `msg` in an envelope. The type must be registered.
    pub fn pack_any<M: TypedMessage>(&self, msg: &M) -> Result<Any, RegistryError> {
        if !self.registry.read().is_registered(M::TYPE_URL) {
            return Err(RegistryError::UnknownTypeUrl(M::TYPE_URL.to_string()));
        }
        Any::pack(msg)
    }

    pub fn unpack_any(&self, any: &Any) -> Result<Box<dyn Message>, RegistryError> {
        self.registry.read().unpack(any)
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}
