//! Messages and the opaque `Any` envelope.

use std::any::Any as StdAny;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;

/// Opaque wire envelope: a type URL plus the encoded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Any {
    /// Encode `msg` into an envelope under its type URL.
    pub fn pack<M: TypedMessage>(msg: &M) -> Result<Self, RegistryError> {
        let value = serde_json::to_vec(msg).map_err(|e| RegistryError::Codec {
            type_url: M::TYPE_URL.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            type_url: M::TYPE_URL.to_string(),
            value,
        })
    }
}

/// A decodable message, object safe so the registry can hand out `Box<dyn Message>`.
pub trait Message: fmt::Debug + Send + Sync + 'static {
    fn type_url(&self) -> &'static str;

    /// String value of a named field, used for signer extraction.
    fn field(&self, _name: &str) -> Option<&str> {
        None
    }

    fn as_any(&self) -> &dyn StdAny;
}

/// A message with a statically known type URL and a wire encoding.
pub trait TypedMessage: Message + Serialize + DeserializeOwned {
    const TYPE_URL: &'static str;
}

impl dyn Message {
    /// Downcast an unpacked message to its concrete type.
    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }
}
