//! # Error Types
//!
//! Defines error types shared by the runtime and by modules.

use thiserror::Error;

/// Errors raised by address codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The human-readable prefix is not a valid bech32 prefix.
    #[error("Invalid bech32 prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// Decoding an empty address string.
    #[error("Empty address string is not allowed")]
    EmptyAddress,

    /// The address was encoded under a different prefix.
    #[error("Invalid address prefix: expected {expected}, got {actual}")]
    PrefixMismatch { expected: String, actual: String },

    /// Bech32 encoding or decoding failed.
    #[error("Bech32 error: {0}")]
    Bech32(String),
}

/// Errors raised by store services and the backing store contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Operation exists in the contract but the backing store does not implement it yet.
    #[error("Store operation '{0}' is not implemented by the backing store")]
    Unimplemented(&'static str),

    /// A change set addressed no namespace.
    #[error("Change set has an empty actor")]
    EmptyActor,
}

/// Errors raised while building or using the signing context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// A signable message has neither signer fields nor a custom get-signers function.
    #[error("No signer resolvable for message {type_url}")]
    MissingSigner { type_url: String },

    /// A declared signer field is absent on the decoded message.
    #[error("Signer field '{field}' missing on message {type_url}")]
    MissingSignerField { type_url: String, field: String },

    /// A custom get-signers function failed.
    #[error("Custom get-signers for {type_url} failed: {reason}")]
    CustomSigner { type_url: String, reason: String },

    /// The signer string could not be decoded by the address codec.
    #[error("Invalid signer address: {0}")]
    Address(#[from] AddressError),
}

/// Errors raised by the interface registry, the amino codec and the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Implementation registered for an interface nobody declared.
    #[error("Interface {0} is not registered")]
    UnknownInterface(String),

    /// Type URL not present in the registry.
    #[error("No implementation registered for type URL {0}")]
    UnknownTypeUrl(String),

    /// Same amino name claimed by two types (or one type under two names).
    #[error("Amino name conflict: {name} already bound to {existing}")]
    AminoConflict { name: String, existing: String },

    /// Registration attempted after the registry was sealed.
    #[error("Registry is sealed; {0} cannot be registered")]
    Sealed(String),

    /// Message bytes could not be encoded or decoded.
    #[error("Codec error for {type_url}: {reason}")]
    Codec { type_url: String, reason: String },

    /// Signing context failure.
    #[error("Signing context error: {0}")]
    Signing(#[from] SigningError),
}

/// Errors raised while constructing modules or the module manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// Module supplied but not declared in the app configuration.
    #[error("Module {0} is not declared in the app configuration")]
    Undeclared(String),

    /// Module declared in the app configuration but not supplied.
    #[error("Module {0} is declared but no module was supplied")]
    NotSupplied(String),

    /// Module factory failed.
    #[error("Module {module} failed to initialize: {reason}")]
    InitializationFailed { module: String, reason: String },

    /// Registration hook failed.
    #[error("Module {module} registration failed: {source}")]
    Registration {
        module: String,
        #[source]
        source: RegistryError,
    },

    /// Service hook failed.
    #[error("Module {module} service registration failed: {source}")]
    Services {
        module: String,
        #[source]
        source: ServiceError,
    },
}

/// Errors raised by service registration and the msg router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Service name registered twice.
    #[error("Service {0} is already registered")]
    DuplicateService(String),

    /// Msg handler registered twice for one type URL.
    #[error("Handler for {0} is already registered")]
    DuplicateHandler(String),

    /// Handler failed.
    #[error("Handler for {type_url} failed: {reason}")]
    Handler { type_url: String, reason: String },
}

/// Errors raised by gas meters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GasError {
    /// Consumption would exceed the meter's limit.
    #[error("Out of gas in {descriptor}: limit {limit}, required {required}")]
    OutOfGas {
        limit: u64,
        required: u64,
        descriptor: String,
    },
}

/// Errors raised when accessing environment capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    /// Capability is not wired in this runtime.
    #[error("Service {0} is not available in this environment")]
    Unavailable(&'static str),
}
