//! # App Runtime Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures/         # auth and bank modules built against app-types
//! └── integration/      # compose() end to end
//!     ├── composition.rs
//!     └── config.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p app-tests
//! cargo test -p app-tests integration::composition::
//! ```

pub mod fixtures;
pub mod integration;
