//! # Composition Driver
//!
//! Two-phase dependency injection over a type-indexed [`Container`]:
//!
//! 1. **provide**: steps that insert values, keyed by type
//! 2. **invoke**: steps that consume provided values for side effects
//!
//! The plan is computed once before anything runs. Only providers reachable
//! from an invoker or from a `require`d type are executed, each at most once,
//! in dependency order with declaration order breaking ties. Duplicate
//! providers, missing required inputs and cycles fail planning.

pub mod container;
pub mod plan;

use std::any::Any;

use tracing::{debug, info, warn};

pub use container::{Container, Dependency};
pub use plan::{Plan, Step, StepKind};

use crate::error::CompositionError;

/// Declared steps plus externally supplied values.
#[derive(Default)]
pub struct Composition {
    steps: Vec<Step>,
    required: Vec<Dependency>,
    container: Container,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `value` available without a provider.
    pub fn supply<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.container.insert(value);
        self
    }

    /// Declare a provider step.
    pub fn provide(&mut self, mut step: Step) -> &mut Self {
        step.kind = StepKind::Provide;
        self.steps.push(step);
        self
    }

    /// Declare an invocation step. Invokers always run.
    pub fn invoke(&mut self, mut step: Step) -> &mut Self {
        step.kind = StepKind::Invoke;
        self.steps.push(step);
        self
    }

    /// Force the provider of `T` to run even if no invoker needs it.
    pub fn require<T: Any>(&mut self) -> &mut Self {
        self.required.push(Dependency::of::<T>());
        self
    }

    pub fn plan(&self) -> Result<Plan, CompositionError> {
        plan::compute(&self.steps, &self.container, &self.required)
    }

    /// Plan, then run every selected step. Aborts on the first error.
    pub fn run(self) -> Result<Container, CompositionError> {
        let plan = self.plan()?;
        let Composition {
            steps,
            mut container,
            ..
        } = self;

        info!(
            declared = steps.len(),
            selected = plan.len(),
            "[Composition] Running plan"
        );

        let mut slots: Vec<Option<Step>> = steps.into_iter().map(Some).collect();
        for &index in &plan.order {
            let Some(step) = slots.get_mut(index).and_then(Option::take) else {
                continue;
            };
            let Step {
                name,
                kind,
                yields,
                run,
                ..
            } = step;

            debug!(step = %name, ?kind, "[Composition] Running step");
            if let Err(e) = run(&mut container) {
                warn!(step = %name, error = %e, "[Composition] Step failed");
                return Err(e);
            }

            if let Some(missing) = yields.iter().find(|dep| !container.contains_dependency(dep)) {
                return Err(CompositionError::ProviderContract {
                    step: name,
                    dependency: missing.name(),
                });
            }
        }

        for step in slots.into_iter().flatten() {
            debug!(step = %step.name, "[Composition] Skipped unused provider");
        }

        Ok(container)
    }
}
