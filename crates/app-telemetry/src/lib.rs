//! # App Telemetry
//!
//! Structured logging for the modular app runtime, built on `tracing`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use app_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `app-runtime` | Service name in logs |
//! | `APP_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `APP_JSON_LOGS` | `false` | JSON output (defaults on inside containers) |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
