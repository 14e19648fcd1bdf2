//! Steps and the build plan computed from them.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::composition::container::{Container, Dependency};
use crate::error::CompositionError;

type StepFn = Box<dyn FnOnce(&mut Container) -> Result<(), CompositionError>>;

/// Whether a step produces values or only consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Provide,
    Invoke,
}

/// One provider or invoker with its typed inputs and outputs.
pub struct Step {
    pub(crate) name: String,
    pub(crate) kind: StepKind,
    pub(crate) needs: Vec<Dependency>,
    pub(crate) wants: Vec<Dependency>,
    pub(crate) yields: Vec<Dependency>,
    pub(crate) run: StepFn,
}

impl Step {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: FnOnce(&mut Container) -> Result<(), CompositionError> + 'static,
    {
        Self {
            name: name.into(),
            kind: StepKind::Provide,
            needs: Vec::new(),
            wants: Vec::new(),
            yields: Vec::new(),
            run: Box::new(run),
        }
    }

    /// Required input. Planning fails if nothing supplies it.
    pub fn needs<T: Any>(mut self) -> Self {
        self.needs.push(Dependency::of::<T>());
        self
    }

    /// Optional input. Absent when nothing supplies it.
    pub fn wants<T: Any>(mut self) -> Self {
        self.wants.push(Dependency::of::<T>());
        self
    }

    /// Output the step must insert before returning.
    pub fn yields<T: Any>(mut self) -> Self {
        self.yields.push(Dependency::of::<T>());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |deps: &[Dependency]| deps.iter().map(Dependency::name).collect::<Vec<_>>();
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("needs", &names(&self.needs))
            .field("wants", &names(&self.wants))
            .field("yields", &names(&self.yields))
            .finish()
    }
}

/// Execution order over the steps that actually need to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub(crate) order: Vec<usize>,
    names: Vec<String>,
}

impl Plan {
    /// Step names in execution order.
    pub fn steps(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Select the steps reachable from invokers and required outputs, then
/// order them topologically. Ties go to the earlier declaration.
pub(crate) fn compute(
    steps: &[Step],
    supplied: &Container,
    required: &[Dependency],
) -> Result<Plan, CompositionError> {
    let providers = index_providers(steps, supplied)?;

    // Reachability
    let mut stack: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, step)| step.kind == StepKind::Invoke)
        .map(|(index, _)| index)
        .collect();

    for dependency in required {
        if supplied.contains_dependency(dependency) {
            continue;
        }
        match providers.get(dependency) {
            Some(&index) => stack.push(index),
            None => {
                return Err(CompositionError::MissingDependency {
                    step: "require".to_string(),
                    dependency: dependency.name(),
                })
            }
        }
    }

    let mut selected = BTreeSet::new();
    while let Some(index) = stack.pop() {
        if !selected.insert(index) {
            continue;
        }
        let step = &steps[index];
        for dependency in &step.needs {
            if supplied.contains_dependency(dependency) {
                continue;
            }
            match providers.get(dependency) {
                Some(&provider) => stack.push(provider),
                None => {
                    return Err(CompositionError::MissingDependency {
                        step: step.name.clone(),
                        dependency: dependency.name(),
                    })
                }
            }
        }
        stack.extend(step.wants.iter().filter_map(|dep| providers.get(dep).copied()));
    }

    // Kahn's algorithm over the selected steps
    let mut indegree: BTreeMap<usize, usize> = selected.iter().map(|&index| (index, 0)).collect();
    let mut dependents: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &index in &selected {
        let step = &steps[index];
        let upstream: BTreeSet<usize> = step
            .needs
            .iter()
            .chain(&step.wants)
            .filter_map(|dep| providers.get(dep).copied())
            .collect();
        for provider in upstream {
            *indegree.entry(index).or_default() += 1;
            dependents.entry(provider).or_default().push(index);
        }
    }

    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(&index, _)| index)
        .collect();
    let mut order = Vec::with_capacity(selected.len());
    while let Some(index) = ready.pop_first() {
        order.push(index);
        for &child in dependents.get(&index).map(Vec::as_slice).unwrap_or_default() {
            if let Some(degree) = indegree.get_mut(&child) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(child);
                }
            }
        }
    }

    if order.len() != selected.len() {
        let stuck = selected
            .iter()
            .filter(|index| !order.contains(*index))
            .map(|&index| steps[index].name.clone())
            .collect();
        return Err(CompositionError::Cycle(stuck));
    }

    let names = order.iter().map(|&index| steps[index].name.clone()).collect();
    Ok(Plan { order, names })
}

fn index_providers(
    steps: &[Step],
    supplied: &Container,
) -> Result<HashMap<Dependency, usize>, CompositionError> {
    let mut providers: HashMap<Dependency, usize> = HashMap::new();
    for (index, step) in steps.iter().enumerate() {
        for dependency in &step.yields {
            if supplied.contains_dependency(dependency) {
                return Err(CompositionError::DuplicateProvider {
                    dependency: dependency.name(),
                    first: "supplied value".to_string(),
                    second: step.name.clone(),
                });
            }
            if let Some(&first) = providers.get(dependency) {
                return Err(CompositionError::DuplicateProvider {
                    dependency: dependency.name(),
                    first: steps[first].name.clone(),
                    second: step.name.clone(),
                });
            }
            providers.insert(*dependency, index);
        }
    }
    Ok(providers)
}
