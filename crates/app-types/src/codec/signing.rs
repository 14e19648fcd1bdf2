//! # Signing Context
//!
//! Describes how the signers of each signable message are extracted:
//! either through a custom get-signers function registered for the type URL,
//! or through the message's annotated signer fields decoded by the account or
//! validator address codec.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::address::AddressCodec;
use crate::codec::message::Message;
use crate::errors::SigningError;

/// Custom signer extraction over the raw message bytes.
pub type GetSignersFn = Arc<dyn Fn(&[u8]) -> Result<Vec<Vec<u8>>, SigningError> + Send + Sync>;

/// Custom get-signers function for one message type, supplied externally.
#[derive(Clone)]
pub struct CustomGetSigner {
    pub msg_type: String,
    pub func: GetSignersFn,
}

impl CustomGetSigner {
    pub fn new(
        msg_type: impl Into<String>,
        func: impl Fn(&[u8]) -> Result<Vec<Vec<u8>>, SigningError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            msg_type: msg_type.into(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for CustomGetSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomGetSigner")
            .field("msg_type", &self.msg_type)
            .finish_non_exhaustive()
    }
}

/// Which address codec decodes a signer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerKind {
    Account,
    Validator,
}

/// A signer annotation on a message field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerField {
    pub name: String,
    pub kind: SignerKind,
}

impl SignerField {
    pub fn account(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SignerKind::Account,
        }
    }

    pub fn validator(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SignerKind::Validator,
        }
    }
}

/// Codecs and custom functions used to build a `SigningContext`.
#[derive(Clone)]
pub struct SigningOptions {
    pub address_codec: Arc<dyn AddressCodec>,
    pub validator_address_codec: Arc<dyn AddressCodec>,
    custom_get_signers: BTreeMap<String, GetSignersFn>,
}

impl SigningOptions {
    pub fn new(
        address_codec: Arc<dyn AddressCodec>,
        validator_address_codec: Arc<dyn AddressCodec>,
    ) -> Self {
        Self {
            address_codec,
            validator_address_codec,
            custom_get_signers: BTreeMap::new(),
        }
    }

    /// Override signer extraction for `msg_type`. Later definitions win.
    pub fn define_custom_get_signers(&mut self, msg_type: impl Into<String>, func: GetSignersFn) {
        self.custom_get_signers.insert(msg_type.into(), func);
    }
}

/// Signer metadata for every signable message in the registry.
pub struct SigningContext {
    options: SigningOptions,
    signers: BTreeMap<String, Vec<SignerField>>,
}

impl SigningContext {
    pub fn new(options: SigningOptions) -> Self {
        Self {
            options,
            signers: BTreeMap::new(),
        }
    }

    pub(crate) fn register_signable(&mut self, type_url: &str, fields: Vec<SignerField>) {
        self.signers.insert(type_url.to_string(), fields);
    }

    pub fn address_codec(&self) -> &Arc<dyn AddressCodec> {
        &self.options.address_codec
    }

    pub fn validator_address_codec(&self) -> &Arc<dyn AddressCodec> {
        &self.options.validator_address_codec
    }

    /// Type URLs of all signable messages, in order.
    pub fn signable_messages(&self) -> impl Iterator<Item = &str> {
        self.signers.keys().map(String::as_str)
    }

    /// Whether signers can be resolved for `type_url`.
    pub fn has_signer(&self, type_url: &str) -> bool {
        self.options.custom_get_signers.contains_key(type_url)
            || self
                .signers
                .get(type_url)
                .is_some_and(|fields| !fields.is_empty())
    }

    /// Every signable message must have a resolvable signer.
    pub fn validate(&self) -> Result<(), SigningError> {
        for type_url in self.signers.keys() {
            if !self.has_signer(type_url) {
                return Err(SigningError::MissingSigner {
                    type_url: type_url.clone(),
                });
            }
        }
        Ok(())
    }

    /// Signer address bytes for a decoded message.
    pub fn get_signers(
        &self,
        type_url: &str,
        raw: &[u8],
        msg: &dyn Message,
    ) -> Result<Vec<Vec<u8>>, SigningError> {
        if let Some(func) = self.options.custom_get_signers.get(type_url) {
            return func(raw);
        }

        let fields = self
            .signers
            .get(type_url)
            .filter(|fields| !fields.is_empty())
            .ok_or_else(|| SigningError::MissingSigner {
                type_url: type_url.to_string(),
            })?;

        fields
            .iter()
            .map(|field| {
                let text = msg
                    .field(&field.name)
                    .ok_or_else(|| SigningError::MissingSignerField {
                        type_url: type_url.to_string(),
                        field: field.name.clone(),
                    })?;
                let codec = match field.kind {
                    SignerKind::Account => &self.options.address_codec,
                    SignerKind::Validator => &self.options.validator_address_codec,
                };
                Ok(codec.string_to_bytes(text)?)
            })
            .collect()
    }
}
