//! Legacy amino codec: stable amino names for interfaces and concrete types.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::RegistryError;

/// Amino codec shared between the App and module hooks.
pub type SharedLegacyAmino = Arc<RwLock<LegacyAmino>>;

/// Name registry for the legacy JSON signing format.
#[derive(Debug, Default)]
pub struct LegacyAmino {
    interfaces: BTreeSet<String>,
    by_name: BTreeMap<String, String>,
    by_type: BTreeMap<String, String>,
    sealed: bool,
}

impl LegacyAmino {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedLegacyAmino {
        Arc::new(RwLock::new(self))
    }

    pub fn register_interface(&mut self, name: &str) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed(name.to_string()));
        }
        self.interfaces.insert(name.to_string());
        Ok(())
    }

    /// Bind `type_url` to `amino_name`.
    ///
    /// Registering the same pair twice is accepted; any other reuse of a name
    /// or a type URL is a conflict.
    pub fn register_concrete(
        &mut self,
        type_url: &str,
        amino_name: &str,
    ) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed(amino_name.to_string()));
        }
        if let Some(existing) = self.by_name.get(amino_name) {
            if existing != type_url {
                return Err(RegistryError::AminoConflict {
                    name: amino_name.to_string(),
                    existing: existing.clone(),
                });
            }
        }
        if let Some(existing) = self.by_type.get(type_url) {
            if existing != amino_name {
                return Err(RegistryError::AminoConflict {
                    name: type_url.to_string(),
                    existing: existing.clone(),
                });
            }
        }

        self.by_name.insert(amino_name.to_string(), type_url.to_string());
        self.by_type.insert(type_url.to_string(), amino_name.to_string());
        Ok(())
    }

    pub fn amino_name(&self, type_url: &str) -> Option<&str> {
        self.by_type.get(type_url).map(String::as_str)
    }

    pub fn type_url(&self, amino_name: &str) -> Option<&str> {
        self.by_name.get(amino_name).map(String::as_str)
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces.contains(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}
