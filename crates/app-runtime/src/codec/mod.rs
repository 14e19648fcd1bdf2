//! # Registry Builder
//!
//! Builds the shared interface registry and legacy amino codec:
//!
//! 1. Signing options from the resolved address codecs plus any custom
//!    get-signers functions
//! 2. Signing-context validation (a failure is returned, not fatal)
//! 3. Standard interfaces registered before any module hook runs

pub mod annotations;

use app_types::codec::{
    CustomGetSigner, InterfaceRegistry, LegacyAmino, SharedInterfaceRegistry, SigningOptions,
};
use app_types::RegistryError;
use tracing::{debug, info};

pub use annotations::{validate_service_annotations, AnnotationViolation, ViolationKind};

use crate::address::AddressCodecSet;
use crate::error::CompositionError;

/// Public key interface.
pub const PUBKEY_INTERFACE: &str = "app.v1.PubKey";
/// Transaction interface.
pub const TX_INTERFACE: &str = "app.v1.Tx";

/// Interfaces every App knows about before modules register theirs.
pub const STD_INTERFACES: [&str; 2] = [PUBKEY_INTERFACE, TX_INTERFACE];

/// Build the registry and validate its signing context.
pub fn provide_interface_registry(
    codecs: &AddressCodecSet,
    custom_signers: &[CustomGetSigner],
) -> Result<SharedInterfaceRegistry, CompositionError> {
    let mut options = SigningOptions::new(codecs.account.clone(), codecs.validator.clone());
    for signer in custom_signers {
        debug!(msg_type = %signer.msg_type, "Defining custom get-signers");
        options.define_custom_get_signers(signer.msg_type.clone(), signer.func.clone());
    }

    let registry = InterfaceRegistry::new(options);
    registry.signing_context().validate()?;

    info!(
        custom_signers = custom_signers.len(),
        "Interface registry created"
    );
    Ok(registry.into_shared())
}

/// Register the standard interfaces.
pub fn register_std_interfaces(registry: &mut InterfaceRegistry) -> Result<(), RegistryError> {
    STD_INTERFACES
        .iter()
        .try_for_each(|name| registry.register_interface(name))
}

/// Register the standard interfaces with the amino codec.
pub fn register_std_amino(amino: &mut LegacyAmino) -> Result<(), RegistryError> {
    STD_INTERFACES
        .iter()
        .try_for_each(|name| amino.register_interface(name))
}
