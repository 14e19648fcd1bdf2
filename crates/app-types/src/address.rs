//! # Address Codecs
//!
//! String <-> bytes conversion for account, validator and consensus
//! addresses. The runtime resolves one codec per address kind; modules only
//! ever see the `AddressCodec` trait.

use std::fmt;

use bech32::{Bech32, Hrp};

use crate::errors::AddressError;

/// Converts between raw address bytes and their string form.
pub trait AddressCodec: fmt::Debug + Send + Sync {
    /// Decode an address string into bytes.
    fn string_to_bytes(&self, text: &str) -> Result<Vec<u8>, AddressError>;

    /// Encode address bytes into a string.
    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError>;

    /// The human-readable prefix, if the codec has one.
    fn prefix(&self) -> Option<&str> {
        None
    }
}

/// Bech32 codec scoped to a single human-readable prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32Codec {
    prefix: String,
    hrp: Hrp,
}

impl Bech32Codec {
    /// Create a codec for `prefix`.
    ///
    /// Fails if the prefix is not a valid bech32 human-readable part. The
    /// prefix is stored lowercase, matching what the codec encodes.
    pub fn new(prefix: impl Into<String>) -> Result<Self, AddressError> {
        let prefix = prefix.into();
        let hrp = Hrp::parse(&prefix).map_err(|e| AddressError::InvalidPrefix {
            prefix: prefix.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            prefix: hrp.to_lowercase(),
            hrp,
        })
    }
}

impl AddressCodec for Bech32Codec {
    fn string_to_bytes(&self, text: &str) -> Result<Vec<u8>, AddressError> {
        if text.trim().is_empty() {
            return Err(AddressError::EmptyAddress);
        }

        let (hrp, data) = bech32::decode(text).map_err(|e| AddressError::Bech32(e.to_string()))?;
        if hrp.to_lowercase() != self.prefix {
            return Err(AddressError::PrefixMismatch {
                expected: self.prefix.clone(),
                actual: hrp.to_lowercase(),
            });
        }

        Ok(data)
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError> {
        bech32::encode::<Bech32>(self.hrp, bytes).map_err(|e| AddressError::Bech32(e.to_string()))
    }

    fn prefix(&self) -> Option<&str> {
        Some(&self.prefix)
    }
}
