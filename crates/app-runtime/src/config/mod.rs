//! # Runtime Configuration
//!
//! Declarative input to composition, loaded from TOML:
//!
//! ```toml
//! [app]
//! name = "simapp"
//! modules = ["runtime", "auth", "bank"]
//!
//! [runtime]
//! override_store_keys = [{ module_name = "bank", kv_store_key = "custombank" }]
//!
//! [auth]
//! bech32_prefix = "cosmos"
//!
//! [staking]
//! bech32_prefix_validator = ""   # defaults to "<prefix>valoper"
//! bech32_prefix_consensus = ""   # defaults to "<prefix>valcons"
//! ```
//!
//! Read-only once composition starts: the runtime wraps it in an `Arc`.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Name under which the runtime itself appears in the module list.
pub const RUNTIME_MODULE: &str = "runtime";

/// Overrides `[app] name`.
pub const ENV_APP_NAME: &str = "APP_NAME";
/// Overrides `[auth] bech32_prefix`.
pub const ENV_BECH32_PREFIX: &str = "APP_BECH32_PREFIX";

/// Configuration errors. All of them abort startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config {path}: {reason}")]
    Io { path: String, reason: String },

    /// Config file is not valid TOML for this schema.
    #[error("Invalid config: {0}")]
    Parse(String),

    /// No account prefix and no full codec override.
    #[error("auth config bech32 prefix cannot be empty if no custom address codec is provided")]
    MissingBech32Prefix,

    /// A configured prefix is not a valid bech32 prefix.
    #[error("Invalid bech32 prefix: {0}")]
    InvalidBech32Prefix(String),

    /// Module listed twice.
    #[error("Module {0} is listed more than once")]
    DuplicateModule(String),

    /// Module with an empty name.
    #[error("Module names cannot be empty")]
    EmptyModuleName,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub runtime: RuntimeModuleConfig,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub staking: Option<StakingConfig>,
}

/// App-level descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Every module in the app, the runtime included.
    #[serde(default)]
    pub modules: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            modules: Vec::new(),
        }
    }
}

fn default_app_name() -> String {
    "app".to_string()
}

/// Configuration of the runtime module itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeModuleConfig {
    #[serde(default)]
    pub override_store_keys: Vec<StoreKeyConfig>,
}

/// Store key name override for one module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreKeyConfig {
    pub module_name: String,
    pub kv_store_key: String,
}

/// Account address settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub bech32_prefix: String,
}

/// Validator and consensus address settings. Empty means derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StakingConfig {
    #[serde(default)]
    pub bech32_prefix_validator: String,
    #[serde(default)]
    pub bech32_prefix_consensus: String,
}

impl RuntimeConfig {
    /// Empty configuration for `app_name`, listing only the runtime module.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app: AppConfig {
                name: app_name.into(),
                modules: vec![RUNTIME_MODULE.to_string()],
            },
            ..Self::default()
        }
    }

    /// Parse and validate TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file, then apply environment
    /// overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `APP_NAME` and `APP_BECH32_PREFIX` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup(ENV_APP_NAME).filter(|v| !v.is_empty()) {
            self.app.name = name;
        }
        if let Some(prefix) = lookup(ENV_BECH32_PREFIX).filter(|v| !v.is_empty()) {
            self.auth.get_or_insert_with(AuthConfig::default).bech32_prefix = prefix;
        }
    }

    /// Module names must be non-empty and unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for name in &self.app.modules {
            if name.is_empty() {
                return Err(ConfigError::EmptyModuleName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateModule(name.clone()));
            }
        }
        Ok(())
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app.modules.extend(modules.into_iter().map(Into::into));
        self
    }

    pub fn with_bech32_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth = Some(AuthConfig {
            bech32_prefix: prefix.into(),
        });
        self
    }

    pub fn with_staking(
        mut self,
        validator: impl Into<String>,
        consensus: impl Into<String>,
    ) -> Self {
        self.staking = Some(StakingConfig {
            bech32_prefix_validator: validator.into(),
            bech32_prefix_consensus: consensus.into(),
        });
        self
    }

    pub fn with_store_key_override(
        mut self,
        module_name: impl Into<String>,
        kv_store_key: impl Into<String>,
    ) -> Self {
        self.runtime.override_store_keys.push(StoreKeyConfig {
            module_name: module_name.into(),
            kv_store_key: kv_store_key.into(),
        });
        self
    }

    /// First override entry for `module_name`.
    pub fn store_key_override(&self, module_name: &str) -> Option<&StoreKeyConfig> {
        self.runtime
            .override_store_keys
            .iter()
            .find(|cfg| cfg.module_name == module_name)
    }

    /// Declared modules other than the runtime, in declaration order.
    pub fn declared_modules(&self) -> impl Iterator<Item = &str> {
        self.app
            .modules
            .iter()
            .map(String::as_str)
            .filter(|name| *name != RUNTIME_MODULE)
    }

    pub fn is_declared(&self, module: &str) -> bool {
        self.app.modules.iter().any(|name| name == module)
    }
}
