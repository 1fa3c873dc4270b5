use crate::error::Result;
use crate::pipeline::{EXCEL_RECORDS, PipelineContext, Step, TypedKey};
use crate::record::RecordSet;
use crate::usecase::PrepareRecords;

/// Extract node - runs the preparation use case and publishes its records
pub struct ExtractRecordsStep {
    use_case: PrepareRecords,
    output: TypedKey<RecordSet>,
}

impl ExtractRecordsStep {
    pub fn new(use_case: PrepareRecords) -> Self {
        Self {
            use_case,
            output: EXCEL_RECORDS,
        }
    }

    pub fn with_output(mut self, output: TypedKey<RecordSet>) -> Self {
        self.output = output;
        self
    }
}

impl Step for ExtractRecordsStep {
    fn name(&self) -> String {
        "ExtractRecords".to_string()
    }

    fn inputs(&self) -> Vec<String> {
        vec![]
    }

    fn outputs(&self) -> Vec<String> {
        vec![self.output.name().to_string()]
    }

    fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        let records = self.use_case.prepare()?;
        context.insert_typed(self.output, records);
        Ok(context)
    }
}
