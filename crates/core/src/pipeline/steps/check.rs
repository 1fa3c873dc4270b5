use crate::error::{Result, SheetloadError};
use crate::pipeline::{PipelineContext, Step};
use crate::store::RecordStore;
use std::sync::Arc;
use tracing::{error, info};

/// Preflight check - the store must answer before anything is loaded
pub struct CheckConnectionStep {
    store: Arc<dyn RecordStore>,
}

impl CheckConnectionStep {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl Step for CheckConnectionStep {
    fn name(&self) -> String {
        "CheckConnection".to_string()
    }

    fn inputs(&self) -> Vec<String> {
        vec![]
    }

    fn outputs(&self) -> Vec<String> {
        vec![]
    }

    fn run(&self, context: PipelineContext) -> Result<PipelineContext> {
        if !self.store.check_connection() {
            error!("Store did not answer the liveness probe");
            return Err(SheetloadError::store_unreachable(
                "liveness probe failed",
            ));
        }
        info!("Store connection OK");
        Ok(context)
    }
}
