// Pipeline core - sequential step execution over a shared context

use super::keys::TypedKey;
use crate::error::{Result, SheetloadError};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use tracing::{error, info};

/// Shared state threaded from step to step.
///
/// Values are stored by key name and read back through a [`TypedKey`], so
/// every key carries one documented type.
#[derive(Default)]
pub struct PipelineContext {
    data: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value with a typed key (compile-time type checking)
    pub fn insert_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>, value: T) {
        self.data.insert(key.name().to_string(), Box::new(value));
    }

    /// Get a value with a typed key; `None` when absent or of another type
    pub fn get_typed<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> Option<&T> {
        self.data
            .get(key.name())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Get a value that must be present with the key's type.
    ///
    /// Absent keys are `MissingInput`; present keys holding another type are
    /// `UnexpectedContextType`.
    pub fn require<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> Result<&T> {
        match self.data.get(key.name()) {
            None => Err(SheetloadError::missing_input(key.name())),
            Some(v) => v
                .downcast_ref::<T>()
                .ok_or_else(|| SheetloadError::unexpected_context_type(key.name())),
        }
    }

    /// Take a value out of the context
    pub fn remove_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>) -> Option<T> {
        if !self.type_matches(key) {
            return None;
        }
        self.data
            .remove(key.name())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    /// Whether any value is stored under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Whether the value under the key has the key's type
    pub fn type_matches<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> bool {
        self.data.get(key.name()).is_some_and(|v| v.is::<T>())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.data.keys().collect();
        keys.sort();
        f.debug_struct("PipelineContext").field("keys", &keys).finish()
    }
}

/// A unit of work in a pipeline.
///
/// Steps are configured once at assembly time and run once per execution.
pub trait Step: Send + Sync {
    fn name(&self) -> String;
    /// Context keys read by the step
    fn inputs(&self) -> Vec<String>;
    /// Context keys written by the step
    fn outputs(&self) -> Vec<String>;

    fn run(&self, context: PipelineContext) -> Result<PipelineContext>;
}

/// Execution state of one step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Running,
    Completed,
    Aborted,
}

/// Per-step states of a run together with its outcome.
pub struct ExecutionReport {
    pub states: Vec<(String, StepState)>,
    pub result: Result<PipelineContext>,
}

impl ExecutionReport {
    pub fn state_of(&self, step: &str) -> Option<StepState> {
        self.states
            .iter()
            .find(|(name, _)| name == step)
            .map(|(_, state)| *state)
    }

    pub fn into_result(self) -> Result<PipelineContext> {
        self.result
    }
}

/// Pipeline - runs its steps strictly in order, stopping at the first failure
pub struct Pipeline {
    name: String,
    steps: Vec<Box<dyn Step>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .finish()
    }
}

impl Pipeline {
    /// An empty step list is a configuration error.
    pub fn new(name: impl Into<String>, steps: Vec<Box<dyn Step>>) -> Result<Self> {
        let name = name.into();
        if steps.is_empty() {
            return Err(SheetloadError::invalid_config(format!(
                "pipeline '{}' has no steps",
                name
            )));
        }
        Ok(Self { name, steps })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn execute(&self, context: PipelineContext) -> Result<PipelineContext> {
        self.execute_with_report(context).into_result()
    }

    /// Run every step, recording how far the run got.
    ///
    /// Failures are returned unchanged; steps already completed are not undone.
    pub fn execute_with_report(&self, mut context: PipelineContext) -> ExecutionReport {
        let mut states: Vec<(String, StepState)> = self
            .steps
            .iter()
            .map(|s| (s.name(), StepState::Pending))
            .collect();

        for (index, step) in self.steps.iter().enumerate() {
            let step_name = states[index].0.clone();
            states[index].1 = StepState::Running;
            info!("▶ Running {}", step_name);

            match step.run(context) {
                Ok(next) => {
                    context = next;
                    states[index].1 = StepState::Completed;
                    info!("✓ {} OK", step_name);
                }
                Err(e) => {
                    states[index].1 = StepState::Aborted;
                    error!("✗ {} failed, aborting pipeline '{}'", step_name, self.name);
                    return ExecutionReport {
                        states,
                        result: Err(e),
                    };
                }
            }
        }

        ExecutionReport {
            states,
            result: Ok(context),
        }
    }
}
