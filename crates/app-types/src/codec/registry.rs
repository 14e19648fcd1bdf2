//! # Interface Registry
//!
//! Maps wire type URLs to decodable message implementations, grouped under
//! the interfaces they implement, and carries the signing context used to
//! extract signers from signable messages.
//!
//! The registry is mutable during setup only. Once the App is finalised it
//! is sealed and every further registration fails with `RegistryError::Sealed`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::codec::message::{Any, Message, TypedMessage};
use crate::codec::signing::{SignerField, SigningContext, SigningOptions};
use crate::errors::RegistryError;

/// Interface implemented by every transaction message.
pub const MSG_INTERFACE: &str = "app.v1.Msg";

/// Registry shared between the codec, the App and module hooks.
pub type SharedInterfaceRegistry = Arc<RwLock<InterfaceRegistry>>;

type DecodeFn = fn(&[u8]) -> Result<Box<dyn Message>, RegistryError>;

fn decode_json<M: TypedMessage>(bytes: &[u8]) -> Result<Box<dyn Message>, RegistryError> {
    let msg: M = serde_json::from_slice(bytes).map_err(|e| RegistryError::Codec {
        type_url: M::TYPE_URL.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Box::new(msg))
}

#[derive(Clone, Copy)]
struct Implementation {
    decode: DecodeFn,
}

/// Registry of interfaces, implementations and signer metadata.
pub struct InterfaceRegistry {
    interfaces: BTreeMap<String, BTreeSet<String>>,
    implementations: BTreeMap<String, Implementation>,
    signing: SigningContext,
    sealed: bool,
}

impl InterfaceRegistry {
    /// Create a registry with the `Msg` interface pre-declared.
    pub fn new(options: SigningOptions) -> Self {
        let mut interfaces = BTreeMap::new();
        interfaces.insert(MSG_INTERFACE.to_string(), BTreeSet::new());
        Self {
            interfaces,
            implementations: BTreeMap::new(),
            signing: SigningContext::new(options),
            sealed: false,
        }
    }

    pub fn into_shared(self) -> SharedInterfaceRegistry {
        Arc::new(RwLock::new(self))
    }

    fn ensure_open(&self, what: &str) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed(what.to_string()));
        }
        Ok(())
    }

    /// Declare an interface. Re-declaring is a no-op.
    pub fn register_interface(&mut self, name: &str) -> Result<(), RegistryError> {
        self.ensure_open(name)?;
        self.interfaces.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Register `M` as an implementation of `interface`.
    pub fn register_implementation<M: TypedMessage>(
        &mut self,
        interface: &str,
    ) -> Result<(), RegistryError> {
        self.ensure_open(M::TYPE_URL)?;
        let implementors = self
            .interfaces
            .get_mut(interface)
            .ok_or_else(|| RegistryError::UnknownInterface(interface.to_string()))?;
        implementors.insert(M::TYPE_URL.to_string());
        self.implementations.insert(
            M::TYPE_URL.to_string(),
            Implementation {
                decode: decode_json::<M>,
            },
        );
        Ok(())
    }

    /// Register a signable message under the `Msg` interface.
    ///
    /// An empty `signers` list is accepted here and rejected by
    /// `SigningContext::validate` unless a custom get-signers function exists.
    pub fn register_msg<M: TypedMessage>(
        &mut self,
        signers: Vec<SignerField>,
    ) -> Result<(), RegistryError> {
        self.register_implementation::<M>(MSG_INTERFACE)?;
        self.signing.register_signable(M::TYPE_URL, signers);
        Ok(())
    }

    /// Decode an envelope by its type URL.
    pub fn unpack(&self, any: &Any) -> Result<Box<dyn Message>, RegistryError> {
        let implementation = self
            .implementations
            .get(&any.type_url)
            .ok_or_else(|| RegistryError::UnknownTypeUrl(any.type_url.clone()))?;
        (implementation.decode)(&any.value)
    }

    /// Signer address bytes of an encoded message.
    pub fn get_signers(&self, any: &Any) -> Result<Vec<Vec<u8>>, RegistryError> {
        let msg = self.unpack(any)?;
        Ok(self.signing.get_signers(&any.type_url, &any.value, msg.as_ref())?)
    }

    pub fn signing_context(&self) -> &SigningContext {
        &self.signing
    }

    pub fn is_registered(&self, type_url: &str) -> bool {
        self.implementations.contains_key(type_url)
    }

    /// All declared interfaces, in order.
    pub fn list_interfaces(&self) -> Vec<String> {
        self.interfaces.keys().cloned().collect()
    }

    /// Implementations of one interface, in order.
    pub fn list_implementations(&self, interface: &str) -> Vec<String> {
        self.interfaces
            .get(interface)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Freeze the registry.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}
