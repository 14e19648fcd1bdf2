//! # App Runtime
//!
//! Composes independently developed modules into one [`App`] ready to be
//! driven by an external execution engine.
//!
//! ## Components
//!
//! | Module           | Responsibility                                        |
//! |------------------|-------------------------------------------------------|
//! | `config`         | TOML configuration and environment overrides          |
//! | `address`        | account / validator / consensus codec resolution      |
//! | `store_keys`     | persistent and memory store key allocation            |
//! | `environment`    | per-module service bundles                            |
//! | `codec`          | interface registry, std interfaces, annotation checks |
//! | `module_manager` | fixed module set and registration hooks               |
//! | `app`            | `AppBuilder`, `App` and capability views              |
//! | `services`       | autocli and reflection query services                 |
//! | `store`          | backing store adapter                                 |
//! | `composition`    | type-indexed provide/invoke driver                    |
//! | `runtime`        | the runtime provider set and `compose()`              |
//!
//! ## Usage
//!
//! ```ignore
//! let config = RuntimeConfig::load("app.toml")?;
//! let factories = ModuleFactories::new()
//!     .with_factory("auth", auth::new)
//!     .with_factory("bank", bank::new);
//! let composed = compose(config, factories, AppInputs::default())?;
//! engine.run(composed.app);
//! ```

pub mod address;
pub mod app;
pub mod codec;
pub mod composition;
pub mod config;
pub mod environment;
pub mod error;
pub mod module_manager;
pub mod runtime;
pub mod services;
pub mod store;
pub mod store_keys;

pub use address::{AddressCodecOverrides, AddressCodecSet};
pub use app::{App, AppBuilder, AppVersionModifier, GenesisTxHandler};
pub use composition::{Composition, Container, Step};
pub use config::{ConfigError, RuntimeConfig};
pub use error::{CompositionError, Severity};
pub use module_manager::ModuleManager;
pub use runtime::{compose, register, AppInputs, ComposedApp, ModuleContext, ModuleFactories};
