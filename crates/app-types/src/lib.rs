//! # App Types Crate
//!
//! Contracts shared by the runtime and by every module.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses the runtime/module
//!   boundary is defined here.
//! - **Namespace Isolation**: a module only ever reaches storage through the
//!   services in its own `Environment`.
//! - **Explicit Absence**: unwired services and unimplemented store
//!   operations are values (`Capability::Unavailable`,
//!   `StoreError::Unimplemented`), never panics.

pub mod address;
pub mod codec;
pub mod environment;
pub mod errors;
pub mod logger;
pub mod module;
pub mod router;
pub mod store;

pub use address::{AddressCodec, Bech32Codec};
pub use environment::{
    Capability, Environment, Event, EventService, EventSink, GasMeter, GasService,
};
pub use errors::*;
pub use logger::Logger;
pub use module::{AppModule, Capabilities, HasAminoCodec, HasInterfaces, HasServices};
pub use store::{StoreKey, StoreKind};
