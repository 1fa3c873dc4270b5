// Controller behaviour: ordering, context threading and abort propagation
use sheetload_core::error::{Result, SheetloadError};
use sheetload_core::pipeline::{Pipeline, PipelineContext, Step, StepState, TypedKey};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

const TRACE: TypedKey<Vec<String>> = TypedKey::new("trace");

struct RecordingStep {
    name: &'static str,
    fail: bool,
    started: Arc<Mutex<Vec<String>>>,
}

impl Step for RecordingStep {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn inputs(&self) -> Vec<String> {
        vec![TRACE.name().to_string()]
    }

    fn outputs(&self) -> Vec<String> {
        vec![TRACE.name().to_string()]
    }

    fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        self.started.lock().unwrap().push(self.name.to_string());
        if self.fail {
            return Err(SheetloadError::store_unreachable("boom"));
        }
        let mut trace = context.remove_typed(TRACE).unwrap_or_default();
        trace.push(self.name.to_string());
        context.insert_typed(TRACE, trace);
        Ok(context)
    }
}

/// Show step logs with `RUST_LOG=debug cargo test -- --nocapture`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn steps(fail_at: Option<&str>, started: &Arc<Mutex<Vec<String>>>) -> Vec<Box<dyn Step>> {
    ["A", "B", "C"]
        .into_iter()
        .map(|name| {
            Box::new(RecordingStep {
                name,
                fail: fail_at == Some(name),
                started: started.clone(),
            }) as Box<dyn Step>
        })
        .collect()
}

#[test]
fn test_steps_run_in_order_and_share_context() {
    init_tracing();
    let started = Arc::new(Mutex::new(Vec::new()));
    let pipeline = Pipeline::new("ordered", steps(None, &started)).unwrap();

    let context = pipeline.execute(PipelineContext::new()).unwrap();

    assert_eq!(context.get_typed(TRACE).unwrap(), &vec!["A", "B", "C"]);
}

#[test]
fn test_failure_aborts_remaining_steps() {
    init_tracing();
    let started = Arc::new(Mutex::new(Vec::new()));
    let pipeline = Pipeline::new("abort", steps(Some("B"), &started)).unwrap();

    let report = pipeline.execute_with_report(PipelineContext::new());

    assert_eq!(report.state_of("A"), Some(StepState::Completed));
    assert_eq!(report.state_of("B"), Some(StepState::Aborted));
    assert_eq!(report.state_of("C"), Some(StepState::Pending));
    assert_eq!(*started.lock().unwrap(), vec!["A", "B"]);
    assert!(matches!(
        report.into_result(),
        Err(SheetloadError::StoreUnreachable(_))
    ));
}

#[test]
fn test_initial_context_is_passed_through() {
    let started = Arc::new(Mutex::new(Vec::new()));
    let pipeline = Pipeline::new("seeded", steps(None, &started)).unwrap();

    let mut initial = PipelineContext::new();
    initial.insert_typed(TRACE, vec!["seed".to_string()]);
    let context = pipeline.execute(initial).unwrap();

    assert_eq!(
        context.get_typed(TRACE).unwrap(),
        &vec!["seed", "A", "B", "C"]
    );
}

#[test]
fn test_empty_step_list_is_rejected() {
    let result = Pipeline::new("empty", Vec::new());
    assert!(matches!(result, Err(SheetloadError::InvalidConfig(_))));
}
