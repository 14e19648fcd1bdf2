//! Msg router builder: one handler per message type URL.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::codec::Message;
use crate::errors::ServiceError;

/// Handles one decoded message, returning the encoded response.
pub type MsgHandler = Arc<dyn Fn(&dyn Message) -> Result<Vec<u8>, ServiceError> + Send + Sync>;

/// Router builder shared between module factories and the App.
pub type SharedMsgRouterBuilder = Arc<RwLock<MsgRouterBuilder>>;

/// Accumulates handlers during composition.
#[derive(Default)]
pub struct MsgRouterBuilder {
    handlers: BTreeMap<String, MsgHandler>,
}

impl MsgRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedMsgRouterBuilder {
        Arc::new(RwLock::new(self))
    }

    pub fn register_handler(
        &mut self,
        type_url: impl Into<String>,
        handler: MsgHandler,
    ) -> Result<(), ServiceError> {
        let type_url = type_url.into();
        if self.handlers.contains_key(&type_url) {
            return Err(ServiceError::DuplicateHandler(type_url));
        }
        self.handlers.insert(type_url, handler);
        Ok(())
    }

    /// Snapshot the handlers into an immutable router.
    pub fn build(&self) -> MsgRouter {
        MsgRouter {
            handlers: self.handlers.clone(),
        }
    }
}

impl fmt::Debug for MsgRouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsgRouterBuilder")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Immutable type URL -> handler table.
#[derive(Clone)]
pub struct MsgRouter {
    handlers: BTreeMap<String, MsgHandler>,
}

impl MsgRouter {
    pub fn handler(&self, type_url: &str) -> Option<&MsgHandler> {
        self.handlers.get(type_url)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
