//! # Configuration From Disk
//!
//! TOML files written to a temp dir, loaded and composed.

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use app_runtime::config::{ENV_APP_NAME, ENV_BECH32_PREFIX};
    use app_runtime::{compose, AppInputs, CompositionError, ConfigError, RuntimeConfig};
    use app_types::AddressCodec;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use tempfile::TempDir;

    use crate::fixtures::{init_test_logging, Harness};

    const SIMAPP_TOML: &str = r#"
[app]
name = "simapp"
modules = ["runtime", "auth", "bank"]

[auth]
bech32_prefix = "cosmos"

[[runtime.override_store_keys]]
module_name = "bank"
kv_store_key = "custombank"
"#;

    /// `load` reads process environment; tests that load hold this lock.
    static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

    fn write_config(dir: &TempDir, text: &str) -> std::path::PathBuf {
        let path = dir.path().join("app.toml");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_load_and_compose_from_file() {
        let _env = ENV_LOCK.lock();
        init_test_logging();
        let dir = TempDir::new().unwrap();
        let config = RuntimeConfig::load(write_config(&dir, SIMAPP_TOML)).unwrap();

        assert_eq!(config.app.name, "simapp");
        assert_eq!(config.declared_modules().collect::<Vec<_>>(), vec!["auth", "bank"]);

        let composed = compose(config, Harness::new().factories(), AppInputs::default()).unwrap();
        assert_eq!(composed.app.name(), "simapp");
        assert!(composed.app.store_key("custombank").is_some());
        assert!(composed.app.store_key("bank").is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[app\nname = ");

        assert!(matches!(RuntimeConfig::load(path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();

        assert!(matches!(
            RuntimeConfig::load(dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_duplicate_module_rejected_on_load() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[app]\nmodules = [\"auth\", \"auth\"]\n");

        assert_eq!(
            RuntimeConfig::load(path).unwrap_err(),
            ConfigError::DuplicateModule("auth".to_string())
        );
    }

    #[test]
    fn test_file_without_prefix_fails_composition() {
        let _env = ENV_LOCK.lock();
        init_test_logging();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[app]\nmodules = [\"runtime\", \"auth\", \"bank\"]\n");
        let config = RuntimeConfig::load(path).unwrap();

        let err = compose(config, Harness::new().factories(), AppInputs::default()).unwrap_err();
        assert_eq!(err, CompositionError::Config(ConfigError::MissingBech32Prefix));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_environment_overrides_loaded_file() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, SIMAPP_TOML);

        env::set_var(ENV_APP_NAME, "gaia");
        env::set_var(ENV_BECH32_PREFIX, "osmo");
        let overridden = RuntimeConfig::load(&path);

        env::set_var(ENV_APP_NAME, "");
        env::set_var(ENV_BECH32_PREFIX, "");
        let empty = RuntimeConfig::load(&path);

        env::remove_var(ENV_APP_NAME);
        env::remove_var(ENV_BECH32_PREFIX);

        let overridden = overridden.unwrap();
        assert_eq!(overridden.app.name, "gaia");
        assert_eq!(overridden.auth.unwrap().bech32_prefix, "osmo");

        let empty = empty.unwrap();
        assert_eq!(empty.app.name, "simapp");
        assert_eq!(empty.auth.unwrap().bech32_prefix, "cosmos");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_any_prefix_derives_validator_and_consensus(prefix in "[a-z]{1,12}") {
            init_test_logging();
            let harness = Harness::new();
            let config = RuntimeConfig::new("simapp")
                .with_modules(["auth", "bank"])
                .with_bech32_prefix(prefix.clone());
            compose(config, harness.factories(), AppInputs::default()).unwrap();

            let codecs = harness.context("auth").unwrap().address_codecs;
            let validator = format!("{prefix}valoper");
            let consensus = format!("{prefix}valcons");
            prop_assert_eq!(codecs.account.prefix(), Some(prefix.as_str()));
            prop_assert_eq!(codecs.validator.prefix(), Some(validator.as_str()));
            prop_assert_eq!(codecs.consensus.prefix(), Some(consensus.as_str()));
        }
    }
}
