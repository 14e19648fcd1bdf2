//! Type-indexed value store filled by providers.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use crate::error::CompositionError;

/// Identifies one value type in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    id: TypeId,
    name: &'static str,
}

impl Dependency {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Rust type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// At most one value per type.
///
/// Values are expected to be cheap handles (`Arc`, `Arc<RwLock<..>>`), so
/// reads clone them out instead of borrowing the container.
#[derive(Default)]
pub struct Container {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn contains_dependency(&self, dependency: &Dependency) -> bool {
        self.values.contains_key(&dependency.id())
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Clone out a required value.
    pub fn resolve<T: Clone + 'static>(&self) -> Result<T, CompositionError> {
        self.get::<T>()
            .cloned()
            .ok_or(CompositionError::MissingDependency {
                step: "resolve".to_string(),
                dependency: type_name::<T>(),
            })
    }

    /// Clone out an optional value. Absent types resolve to `None`.
    pub fn optional<T: Clone + 'static>(&self) -> Option<T> {
        self.get::<T>().cloned()
    }

    /// Move a value out of the container.
    pub fn take<T: 'static>(&mut self) -> Result<T, CompositionError> {
        let missing = || CompositionError::MissingDependency {
            step: "take".to_string(),
            dependency: type_name::<T>(),
        };
        let boxed = self.values.remove(&TypeId::of::<T>()).ok_or_else(missing)?;
        boxed.downcast::<T>().map(|value| *value).map_err(|_| missing())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("values", &self.values.len())
            .finish()
    }
}
