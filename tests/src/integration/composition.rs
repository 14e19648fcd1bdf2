//! # End-to-End Composition
//!
//! Composes `simapp` (runtime, auth, bank) and checks what the execution
//! engine would receive.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use app_runtime::services::{
        AutoCliQueryService, ReflectionService, AUTOCLI_QUERY_SERVICE, REFLECTION_SERVICE,
    };
    use app_runtime::{compose, AppInputs, ComposedApp, CompositionError, RuntimeConfig, Severity};
    use app_types::codec::{Any, CustomGetSigner, SignerField, TypedMessage, MSG_INTERFACE};
    use app_types::module::ServiceTable;
    use app_types::store::{BranchState, KvStore, Store};
    use app_types::{
        AddressCodec, Capabilities, ModuleError, RegistryError, ServiceError, StoreError,
    };

    use crate::fixtures::{
        init_test_logging, simapp_config, Harness, MsgSend, MsgSendResponse, MsgUpdateParams,
        ServiceStub,
    };

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn compose_simapp(harness: &Harness) -> ComposedApp {
        compose_with(harness, simapp_config())
    }

    fn compose_with(harness: &Harness, config: RuntimeConfig) -> ComposedApp {
        init_test_logging();
        compose(config, harness.factories(), AppInputs::default()).unwrap()
    }

    fn key_names(composed: &ComposedApp) -> Vec<String> {
        composed
            .app
            .store_keys()
            .iter()
            .map(|key| key.name().to_string())
            .collect()
    }

    fn address(composed: &ComposedApp, byte: u8) -> String {
        composed
            .app
            .interface_registry()
            .read()
            .signing_context()
            .address_codec()
            .bytes_to_string(&[byte; 20])
            .unwrap()
    }

    // =========================================================================
    // MODULE SET AND STORE KEYS
    // =========================================================================

    #[test]
    fn test_module_manager_holds_exactly_declared_modules() {
        let harness = Harness::new();
        let composed = compose_simapp(&harness);
        let manager = composed.app.module_manager();

        assert_eq!(manager.names(), vec!["auth", "bank"]);
        assert!(!manager.contains("runtime"));
        assert_eq!(
            manager.capabilities("bank"),
            Some(Capabilities {
                interfaces: true,
                legacy_amino: true,
                services: true,
            })
        );
    }

    #[test]
    fn test_store_keys_follow_module_order() {
        let composed = compose_simapp(&Harness::new());

        assert_eq!(
            key_names(&composed),
            vec!["auth", "memory:auth", "bank", "memory:bank"]
        );
        assert!(composed.app.store_key("runtime").is_none());
    }

    #[test]
    fn test_store_key_override_reaches_module_environment() {
        let harness = Harness::new();
        let config = simapp_config().with_store_key_override("bank", "custombank");
        let composed = compose_with(&harness, config);

        assert_eq!(
            key_names(&composed),
            vec!["auth", "memory:auth", "custombank", "memory:bank"]
        );

        let bank = harness.context("bank").unwrap();
        let auth = harness.context("auth").unwrap();
        assert_eq!(bank.environment.kv_store_service.actor(), b"custombank");
        assert_eq!(bank.environment.memory_store_service.actor(), b"memory:bank");

        let mut state = BranchState::new();
        bank.environment
            .kv_store_service
            .open(&mut state)
            .unwrap()
            .set(b"supply", b"100")
            .unwrap();
        assert_eq!(
            auth.environment
                .kv_store_service
                .open(&mut state)
                .unwrap()
                .get(b"supply")
                .unwrap(),
            None
        );
        assert!(state.actor(b"custombank").is_some());
    }

    #[test]
    fn test_colliding_override_is_fatal() {
        let config = simapp_config().with_store_key_override("bank", "auth");
        init_test_logging();
        let err = compose(config, Harness::new().factories(), AppInputs::default()).unwrap_err();

        assert_eq!(err, CompositionError::DuplicateStoreKey("auth".to_string()));
        assert_eq!(err.severity(), Severity::Fatal);
    }

    #[test]
    fn test_composition_is_deterministic() {
        let first = compose_simapp(&Harness::new());
        let second = compose_simapp(&Harness::new());

        assert_eq!(key_names(&first), key_names(&second));
        assert_eq!(
            first.app.module_manager().names(),
            second.app.module_manager().names()
        );
        assert_eq!(
            first.app.interface_registry().read().list_interfaces(),
            second.app.interface_registry().read().list_interfaces()
        );
    }

    // =========================================================================
    // CODECS AND SIGNING
    // =========================================================================

    #[test]
    fn test_address_codecs_use_configured_prefix() {
        let harness = Harness::new();
        let composed = compose_simapp(&harness);
        let registry = composed.app.interface_registry().read();
        let signing = registry.signing_context();

        let empty = signing.address_codec().bytes_to_string(&[]).unwrap();
        assert!(empty.starts_with("cosmos1"));
        assert_eq!(signing.validator_address_codec().prefix(), Some("cosmosvaloper"));

        let codecs = harness.context("auth").unwrap().address_codecs;
        assert_eq!(codecs.consensus.prefix(), Some("cosmosvalcons"));
    }

    #[test]
    fn test_staking_prefixes_take_precedence() {
        let harness = Harness::new();
        let config = simapp_config().with_staking("cosmosoper", "cosmoscons");
        compose_with(&harness, config);

        let codecs = harness.context("bank").unwrap().address_codecs;
        assert_eq!(codecs.validator.prefix(), Some("cosmosoper"));
        assert_eq!(codecs.consensus.prefix(), Some("cosmoscons"));
        assert_eq!(codecs.account.prefix(), Some("cosmos"));
    }

    #[test]
    fn test_signers_resolve_through_registry() {
        let composed = compose_simapp(&Harness::new());
        let msg = MsgSend {
            from_address: address(&composed, 7),
            to_address: address(&composed, 8),
            amount: 5,
        };

        let any = Any::pack(&msg).unwrap();
        let signers = composed
            .app
            .interface_registry()
            .read()
            .get_signers(&any)
            .unwrap();
        assert_eq!(signers, vec![vec![7u8; 20]]);
    }

    #[test]
    fn test_module_messages_registered_in_both_codecs() {
        let composed = compose_simapp(&Harness::new());
        let registry = composed.app.interface_registry().read();
        let amino = composed.app.legacy_amino().read();

        assert_eq!(
            registry.list_implementations(MSG_INTERFACE),
            vec![
                MsgUpdateParams::TYPE_URL.to_string(),
                MsgSend::TYPE_URL.to_string(),
            ]
        );
        assert_eq!(amino.amino_name(MsgSend::TYPE_URL), Some("cosmos-sdk/MsgSend"));
        assert!(registry.is_sealed());
        assert!(amino.is_sealed());
    }

    #[test]
    fn test_sealed_registry_rejects_late_registration() {
        let composed = compose_simapp(&Harness::new());
        let err = composed
            .app
            .interface_registry()
            .write()
            .register_msg::<MsgSend>(vec![SignerField::account("from_address")])
            .unwrap_err();

        assert!(matches!(err, RegistryError::Sealed(_)));
    }

    #[test]
    fn test_app_codec_unpacks_module_messages() {
        let composed = compose_simapp(&Harness::new());
        let codec = composed.app.codec();
        let msg = MsgUpdateParams {
            authority: address(&composed, 9),
            max_memo_characters: 256,
        };

        let any = codec.pack_any(&msg).unwrap();
        let unpacked = codec.unpack_any(&any).unwrap();
        assert_eq!(unpacked.downcast_ref::<MsgUpdateParams>(), Some(&msg));

        let unknown = Any {
            type_url: "/bank.v1.MsgBurn".to_string(),
            value: Vec::new(),
        };
        assert_eq!(
            codec.unpack_any(&unknown).unwrap_err(),
            RegistryError::UnknownTypeUrl("/bank.v1.MsgBurn".to_string())
        );
    }

    #[test]
    fn test_custom_signer_supplied_as_input() {
        init_test_logging();
        let inputs = AppInputs {
            custom_signers: vec![CustomGetSigner::new("/bank.v1.MsgMultiSend", |_| {
                Ok(vec![vec![1u8; 20]])
            })],
            ..AppInputs::default()
        };
        let composed = compose(simapp_config(), Harness::new().factories(), inputs).unwrap();

        assert!(composed
            .app
            .interface_registry()
            .read()
            .signing_context()
            .has_signer("/bank.v1.MsgMultiSend"));
    }

    // =========================================================================
    // ROUTING AND SERVICES
    // =========================================================================

    #[test]
    fn test_msg_router_dispatches_to_bank() {
        let harness = Harness::new();
        let composed = compose_simapp(&harness);
        let alice = address(&composed, 1);
        let bob = address(&composed, 2);
        harness.fund(&alice, 100);

        let handler = composed.app.msg_router().handler(MsgSend::TYPE_URL).unwrap();
        let send = MsgSend {
            from_address: alice.clone(),
            to_address: bob.clone(),
            amount: 40,
        };

        let response: MsgSendResponse = serde_json::from_slice(&handler(&send).unwrap()).unwrap();
        assert_eq!(response.remaining, 60);
        assert_eq!(harness.balance(&bob), 40);

        let overdraft = MsgSend { amount: 500, ..send };
        assert!(matches!(handler(&overdraft), Err(ServiceError::Handler { .. })));
        assert_eq!(harness.balance(&alice), 60);
    }

    #[test]
    fn test_register_services_adds_runtime_services() {
        let composed = compose_simapp(&Harness::new());
        let mut table = ServiceTable::new();
        composed.app.register_services(&mut table).unwrap();

        assert_eq!(
            table.names(),
            vec![
                "auth.v1.Msg",
                "auth.v1.Query",
                AUTOCLI_QUERY_SERVICE,
                "bank.v1.Msg",
                "bank.v1.Query",
                REFLECTION_SERVICE,
            ]
        );

        let autocli = table.server::<AutoCliQueryService>(AUTOCLI_QUERY_SERVICE).unwrap();
        let bank = &autocli.app_options()["bank"];
        assert_eq!(bank.tx_services, vec!["bank.v1.Msg"]);
        assert_eq!(bank.query_services, vec!["bank.v1.Query"]);

        let bank_msg = table.server::<ServiceStub>("bank.v1.Msg").unwrap();
        assert_eq!(bank_msg.module, "bank");

        let reflection = table.server::<ReflectionService>(REFLECTION_SERVICE).unwrap();
        assert!(reflection
            .implementations(MSG_INTERFACE)
            .contains(&MsgSend::TYPE_URL.to_string()));
    }

    #[test]
    fn test_services_register_once() {
        let composed = compose_simapp(&Harness::new());
        let mut table = ServiceTable::new();
        composed.app.register_services(&mut table).unwrap();

        assert!(matches!(
            composed.app.register_services(&mut table),
            Err(CompositionError::Module(ModuleError::Services { .. }))
        ));
    }

    // =========================================================================
    // CAPABILITIES AND FAILURES
    // =========================================================================

    #[test]
    fn test_capability_views_share_app_state() {
        let composed = compose_simapp(&Harness::new());

        composed.app_version_modifier.set_app_version(4).unwrap();
        assert_eq!(composed.app.app_version(), 4);
        assert_eq!(composed.app.app_version_modifier().app_version().unwrap(), 4);
        assert!(matches!(
            composed.genesis_tx_handler.execute_genesis_tx(b"tx"),
            Err(StoreError::Unimplemented(_))
        ));
    }

    #[test]
    fn test_declared_module_without_factory_aborts() {
        init_test_logging();
        let config = simapp_config().with_modules(["staking"]);
        let err = compose(config, Harness::new().factories(), AppInputs::default()).unwrap_err();

        assert_eq!(
            err,
            CompositionError::Module(ModuleError::NotSupplied("staking".to_string()))
        );
    }

    #[test]
    fn test_undeclared_module_aborts() {
        init_test_logging();
        let config = RuntimeConfig::new("simapp")
            .with_modules(["auth"])
            .with_bech32_prefix("cosmos");
        let err = compose(config, Harness::new().factories(), AppInputs::default()).unwrap_err();

        assert_eq!(
            err,
            CompositionError::Module(ModuleError::Undeclared("bank".to_string()))
        );
    }

    #[test]
    fn test_root_store_input_is_used() {
        use app_runtime::store::MemoryRootStore;
        use app_runtime::store::RootStore;
        use app_types::store::StateChanges;

        init_test_logging();
        let root = Arc::new(MemoryRootStore::new());
        root.apply(&[StateChanges {
            actor: b"bank".to_vec(),
            pairs: vec![(b"supply".to_vec(), b"1".to_vec())],
        }])
        .unwrap();

        let inputs = AppInputs {
            root_store: Some(root as Arc<dyn RootStore>),
            ..AppInputs::default()
        };
        let composed = compose(simapp_config(), Harness::new().factories(), inputs).unwrap();
        assert_eq!(composed.app.store().latest_version().unwrap(), 1);
    }
}
