//! # Integration Tests
//!
//! Full `compose()` runs against the fixture modules:
//!
//! - `composition`: module set, store keys, codecs, routing, services
//! - `config`: TOML files on disk through to a composed App

pub mod composition;
pub mod config;
