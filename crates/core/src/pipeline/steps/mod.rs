// ETL pipeline steps

pub mod check;
pub mod extract;
pub mod store;

pub use check::CheckConnectionStep;
pub use extract::ExtractRecordsStep;
pub use store::{LoadStrategy, StoreRecordsStep};
