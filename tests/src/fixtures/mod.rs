//! # Fixture Modules
//!
//! Two small modules written the way an application module would be:
//!
//! - **auth**: one governance message, an amino name and a query service
//! - **bank**: `MsgSend` with a msg router handler over an in-memory ledger
//!
//! [`Harness`] builds their factories and records every `ModuleContext`
//! the runtime hands out, so tests can inspect what each module received.

use std::collections::BTreeMap;
use std::sync::{Arc, Once};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use app_runtime::{ModuleContext, ModuleFactories, RuntimeConfig};
use app_telemetry::{init_logging, TelemetryConfig};
use app_types::codec::{InterfaceRegistry, LegacyAmino, Message, SignerField, TypedMessage};
use app_types::module::{MethodDescriptor, ServiceDescriptor, ServiceKind, ServiceRegistrar};
use app_types::router::MsgHandler;
use app_types::{
    AppModule, HasAminoCodec, HasInterfaces, HasServices, ModuleError, RegistryError,
    ServiceError,
};

static LOGGING: Once = Once::new();

/// Install the tracing subscriber once per test binary.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            ..TelemetryConfig::default()
        };
        // another test harness may already own the global subscriber
        let _ = init_logging(&config);
    });
}

/// `simapp` with auth and bank under the `cosmos` prefix.
pub fn simapp_config() -> RuntimeConfig {
    RuntimeConfig::new("simapp")
        .with_modules(["auth", "bank"])
        .with_bech32_prefix("cosmos")
}

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: String,
    pub max_memo_characters: u64,
}

impl Message for MsgUpdateParams {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn field(&self, name: &str) -> Option<&str> {
        (name == "authority").then_some(self.authority.as_str())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl TypedMessage for MsgUpdateParams {
    const TYPE_URL: &'static str = "/auth.v1.MsgUpdateParams";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: u64,
}

impl Message for MsgSend {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "from_address" => Some(&self.from_address),
            "to_address" => Some(&self.to_address),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl TypedMessage for MsgSend {
    const TYPE_URL: &'static str = "/bank.v1.MsgSend";
}

/// Encoded by the bank handler on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSendResponse {
    pub remaining: u64,
}

// =============================================================================
// SERVICES
// =============================================================================

/// Server object registered for every fixture service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStub {
    pub module: String,
    pub service: String,
}

fn service(name: &str, kind: ServiceKind, methods: &[(&str, &str, &str)]) -> ServiceDescriptor {
    ServiceDescriptor {
        name: name.to_string(),
        kind,
        msg_service_annotated: kind == ServiceKind::Msg,
        methods: methods
            .iter()
            .map(|(method, request, response)| MethodDescriptor {
                name: method.to_string(),
                request_type_url: request.to_string(),
                response_type_url: response.to_string(),
            })
            .collect(),
    }
}

fn register_stubs(
    module: &str,
    descriptors: Vec<ServiceDescriptor>,
    registrar: &mut dyn ServiceRegistrar,
) -> Result<(), ServiceError> {
    for descriptor in descriptors {
        let stub = ServiceStub {
            module: module.to_string(),
            service: descriptor.name.clone(),
        };
        registrar.register_service(descriptor, Arc::new(stub))?;
    }
    Ok(())
}

// =============================================================================
// AUTH
// =============================================================================

pub struct AuthModule;

impl HasInterfaces for AuthModule {
    fn register_interfaces(&self, registry: &mut InterfaceRegistry) -> Result<(), RegistryError> {
        registry.register_msg::<MsgUpdateParams>(vec![SignerField::account("authority")])
    }
}

impl HasAminoCodec for AuthModule {
    fn register_legacy_amino_codec(&self, amino: &mut LegacyAmino) -> Result<(), RegistryError> {
        amino.register_concrete(MsgUpdateParams::TYPE_URL, "cosmos-sdk/x/auth/MsgUpdateParams")
    }
}

impl HasServices for AuthModule {
    fn service_descriptors(&self) -> Vec<ServiceDescriptor> {
        vec![
            service(
                "auth.v1.Msg",
                ServiceKind::Msg,
                &[("UpdateParams", MsgUpdateParams::TYPE_URL, "/auth.v1.MsgUpdateParamsResponse")],
            ),
            service(
                "auth.v1.Query",
                ServiceKind::Query,
                &[("Params", "/auth.v1.QueryParamsRequest", "/auth.v1.QueryParamsResponse")],
            ),
        ]
    }

    fn register_services(&self, registrar: &mut dyn ServiceRegistrar) -> Result<(), ServiceError> {
        register_stubs("auth", self.service_descriptors(), registrar)
    }
}

impl AppModule for AuthModule {
    fn as_interface_registrar(&self) -> Option<&dyn HasInterfaces> {
        Some(self)
    }

    fn as_amino_registrar(&self) -> Option<&dyn HasAminoCodec> {
        Some(self)
    }

    fn as_service_provider(&self) -> Option<&dyn HasServices> {
        Some(self)
    }
}

// =============================================================================
// BANK
// =============================================================================

/// Balances by address string.
pub type Ledger = Arc<Mutex<BTreeMap<String, u64>>>;

pub struct BankModule;

impl BankModule {
    /// Register the `MsgSend` handler and return the module.
    pub fn new(ctx: &ModuleContext, ledger: Ledger) -> Result<Self, ModuleError> {
        let handler: MsgHandler = Arc::new(move |msg: &dyn Message| {
            let send = msg.downcast_ref::<MsgSend>().ok_or_else(|| ServiceError::Handler {
                type_url: msg.type_url().to_string(),
                reason: "not a MsgSend".to_string(),
            })?;
            let remaining = transfer(&ledger, send)?;
            serde_json::to_vec(&MsgSendResponse { remaining }).map_err(|e| ServiceError::Handler {
                type_url: MsgSend::TYPE_URL.to_string(),
                reason: e.to_string(),
            })
        });

        ctx.msg_router
            .write()
            .register_handler(MsgSend::TYPE_URL, handler)
            .map_err(|e| ModuleError::InitializationFailed {
                module: ctx.name.clone(),
                reason: e.to_string(),
            })?;
        ctx.logger.debug("MsgSend handler registered");
        Ok(Self)
    }
}

fn transfer(ledger: &Ledger, send: &MsgSend) -> Result<u64, ServiceError> {
    let mut balances = ledger.lock();
    let available = balances.get(&send.from_address).copied().unwrap_or(0);
    if available < send.amount {
        return Err(ServiceError::Handler {
            type_url: MsgSend::TYPE_URL.to_string(),
            reason: format!("insufficient funds: {} < {}", available, send.amount),
        });
    }
    let remaining = available - send.amount;
    balances.insert(send.from_address.clone(), remaining);
    *balances.entry(send.to_address.clone()).or_insert(0) += send.amount;
    Ok(remaining)
}

impl HasInterfaces for BankModule {
    fn register_interfaces(&self, registry: &mut InterfaceRegistry) -> Result<(), RegistryError> {
        registry.register_msg::<MsgSend>(vec![SignerField::account("from_address")])
    }
}

impl HasAminoCodec for BankModule {
    fn register_legacy_amino_codec(&self, amino: &mut LegacyAmino) -> Result<(), RegistryError> {
        amino.register_concrete(MsgSend::TYPE_URL, "cosmos-sdk/MsgSend")
    }
}

impl HasServices for BankModule {
    fn service_descriptors(&self) -> Vec<ServiceDescriptor> {
        vec![
            service(
                "bank.v1.Msg",
                ServiceKind::Msg,
                &[("Send", MsgSend::TYPE_URL, "/bank.v1.MsgSendResponse")],
            ),
            service(
                "bank.v1.Query",
                ServiceKind::Query,
                &[("Balance", "/bank.v1.QueryBalanceRequest", "/bank.v1.QueryBalanceResponse")],
            ),
        ]
    }

    fn register_services(&self, registrar: &mut dyn ServiceRegistrar) -> Result<(), ServiceError> {
        register_stubs("bank", self.service_descriptors(), registrar)
    }
}

impl AppModule for BankModule {
    fn as_interface_registrar(&self) -> Option<&dyn HasInterfaces> {
        Some(self)
    }

    fn as_amino_registrar(&self) -> Option<&dyn HasAminoCodec> {
        Some(self)
    }

    fn as_service_provider(&self) -> Option<&dyn HasServices> {
        Some(self)
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// Builds fixture factories and keeps what they were given.
#[derive(Clone, Default)]
pub struct Harness {
    contexts: Arc<Mutex<BTreeMap<String, ModuleContext>>>,
    ledger: Ledger,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factories for auth and bank.
    pub fn factories(&self) -> ModuleFactories {
        let auth_contexts = Arc::clone(&self.contexts);
        let bank_contexts = Arc::clone(&self.contexts);
        let ledger = Arc::clone(&self.ledger);

        ModuleFactories::new()
            .with_factory("auth", move |ctx: ModuleContext| {
                auth_contexts.lock().insert(ctx.name.clone(), ctx);
                let module: Arc<dyn AppModule> = Arc::new(AuthModule);
                Ok(module)
            })
            .with_factory("bank", move |ctx: ModuleContext| {
                let bank = BankModule::new(&ctx, Arc::clone(&ledger))?;
                bank_contexts.lock().insert(ctx.name.clone(), ctx);
                let module: Arc<dyn AppModule> = Arc::new(bank);
                Ok(module)
            })
    }

    /// Context handed to `module`, if its factory ran.
    pub fn context(&self, module: &str) -> Option<ModuleContext> {
        self.contexts.lock().get(module).cloned()
    }

    pub fn fund(&self, address: &str, amount: u64) {
        self.ledger.lock().insert(address.to_string(), amount);
    }

    pub fn balance(&self, address: &str) -> u64 {
        self.ledger.lock().get(address).copied().unwrap_or(0)
    }
}
