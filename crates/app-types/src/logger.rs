//! Logger handle shared by the runtime and every module environment.

use std::sync::Arc;

/// Cheap clonable handle over `tracing` carrying a component field.
#[derive(Debug, Clone)]
pub struct Logger {
    component: Arc<str>,
}

impl Logger {
    pub fn new(component: impl AsRef<str>) -> Self {
        Self {
            component: Arc::from(component.as_ref()),
        }
    }

    /// Logger for a sub-component, e.g. `runtime/bank`.
    pub fn scoped(&self, name: &str) -> Self {
        Self::new(format!("{}/{}", self.component, name))
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(component = %self.component, "{}", message);
    }

    pub fn info(&self, message: &str) {
        tracing::info!(component = %self.component, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(component = %self.component, "{}", message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!(component = %self.component, "{}", message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("app")
    }
}
