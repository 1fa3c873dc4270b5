// Unit tests for PipelineBuilder
use sheetload_core::error::{Result, SheetloadError};
use sheetload_core::pipeline::{PipelineBuilder, PipelineContext, Step};

struct TestStep {
    name: String,
}

impl Step for TestStep {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn inputs(&self) -> Vec<String> {
        vec![]
    }

    fn outputs(&self) -> Vec<String> {
        vec![]
    }

    fn run(&self, data: PipelineContext) -> Result<PipelineContext> {
        Ok(data)
    }
}

fn step(name: &str) -> TestStep {
    TestStep {
        name: name.to_string(),
    }
}

#[test]
fn test_builder_keeps_declared_order() {
    let pipeline = PipelineBuilder::new("test")
        .add_step(step("a"))
        .add_step(step("b"))
        .add_boxed(Box::new(step("c")))
        .build()
        .unwrap();

    assert_eq!(pipeline.name(), "test");
    assert_eq!(pipeline.step_names(), vec!["a", "b", "c"]);
}

#[test]
fn test_builder_optional_step() {
    let pipeline = PipelineBuilder::new("test")
        .add_step(step("a"))
        .add_optional(None::<TestStep>)
        .add_optional(Some(step("b")))
        .build()
        .unwrap();

    assert_eq!(pipeline.len(), 2);
}

#[test]
fn test_builder_rejects_empty_pipeline() {
    let result = PipelineBuilder::new("empty").build();
    assert!(matches!(result, Err(SheetloadError::InvalidConfig(_))));
}
