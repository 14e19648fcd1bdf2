//! # Address Codec Resolution
//!
//! Decides how account, validator and consensus addresses are encoded.
//!
//! - All three factory overrides present: they win, config is not read.
//! - Otherwise the account prefix from `[auth]` is mandatory.
//! - Validator and consensus prefixes default to `<prefix>valoper` and
//!   `<prefix>valcons`.

use std::fmt;
use std::sync::Arc;

use app_types::{AddressCodec, Bech32Codec};
use tracing::debug;

use crate::config::{ConfigError, RuntimeConfig};

/// Builds one externally supplied codec.
pub type AddressCodecFactory = Arc<dyn Fn() -> Arc<dyn AddressCodec> + Send + Sync>;

/// The three address codecs of an App.
#[derive(Debug, Clone)]
pub struct AddressCodecSet {
    pub account: Arc<dyn AddressCodec>,
    pub validator: Arc<dyn AddressCodec>,
    pub consensus: Arc<dyn AddressCodec>,
}

/// Optional factories. Only used when all three are set.
#[derive(Clone, Default)]
pub struct AddressCodecOverrides {
    pub account: Option<AddressCodecFactory>,
    pub validator: Option<AddressCodecFactory>,
    pub consensus: Option<AddressCodecFactory>,
}

impl AddressCodecOverrides {
    pub fn new(
        account: AddressCodecFactory,
        validator: AddressCodecFactory,
        consensus: AddressCodecFactory,
    ) -> Self {
        Self {
            account: Some(account),
            validator: Some(validator),
            consensus: Some(consensus),
        }
    }

    fn complete(&self) -> Option<AddressCodecSet> {
        match (&self.account, &self.validator, &self.consensus) {
            (Some(account), Some(validator), Some(consensus)) => Some(AddressCodecSet {
                account: account(),
                validator: validator(),
                consensus: consensus(),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for AddressCodecOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressCodecOverrides")
            .field("account", &self.account.is_some())
            .field("validator", &self.validator.is_some())
            .field("consensus", &self.consensus.is_some())
            .finish()
    }
}

/// Resolve the codec set from overrides or configuration.
pub fn resolve_address_codecs(
    config: &RuntimeConfig,
    overrides: &AddressCodecOverrides,
) -> Result<AddressCodecSet, ConfigError> {
    if let Some(set) = overrides.complete() {
        debug!("Using externally supplied address codecs");
        return Ok(set);
    }

    let prefix = config
        .auth
        .as_ref()
        .map(|auth| auth.bech32_prefix.as_str())
        .filter(|prefix| !prefix.is_empty())
        .ok_or(ConfigError::MissingBech32Prefix)?;

    let staking = config.staking.clone().unwrap_or_default();
    let validator = if staking.bech32_prefix_validator.is_empty() {
        format!("{prefix}valoper")
    } else {
        staking.bech32_prefix_validator
    };
    let consensus = if staking.bech32_prefix_consensus.is_empty() {
        format!("{prefix}valcons")
    } else {
        staking.bech32_prefix_consensus
    };

    debug!(
        account = prefix,
        validator = %validator,
        consensus = %consensus,
        "Resolved bech32 prefixes"
    );

    Ok(AddressCodecSet {
        account: bech32(prefix)?,
        validator: bech32(&validator)?,
        consensus: bech32(&consensus)?,
    })
}

fn bech32(prefix: &str) -> Result<Arc<dyn AddressCodec>, ConfigError> {
    let codec =
        Bech32Codec::new(prefix).map_err(|_| ConfigError::InvalidBech32Prefix(prefix.to_string()))?;
    Ok(Arc::new(codec))
}
