// Pipeline builder for fluent pipeline construction
use super::core::{Pipeline, Step};
use crate::error::Result;

/// Builder for assembling a pipeline step by step
pub struct PipelineBuilder {
    name: String,
    steps: Vec<Box<dyn Step>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Add a step
    pub fn add_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add an already boxed step
    pub fn add_boxed(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    /// Add a step only when `step` is `Some`
    pub fn add_optional(self, step: Option<impl Step + 'static>) -> Self {
        match step {
            Some(step) => self.add_step(step),
            None => self,
        }
    }

    /// Build the pipeline
    pub fn build(self) -> Result<Pipeline> {
        Pipeline::new(self.name, self.steps)
    }
}
