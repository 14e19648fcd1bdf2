//! # Codec Layer
//!
//! - `message`: the `Any` envelope and the `Message` traits
//! - `registry`: interface registry (type URL -> decoder) with signer metadata
//! - `signing`: signing options, custom get-signers and validation
//! - `amino`: legacy amino name registry
//! - `proto`: codec over the shared registry

pub mod amino;
pub mod message;
pub mod proto;
pub mod registry;
pub mod signing;

pub use amino::{LegacyAmino, SharedLegacyAmino};
pub use message::{Any, Message, TypedMessage};
pub use proto::Codec;
pub use registry::{InterfaceRegistry, SharedInterfaceRegistry, MSG_INTERFACE};
pub use signing::{
    CustomGetSigner, GetSignersFn, SignerField, SignerKind, SigningContext, SigningOptions,
};
