//! In-memory tabular data flowing between pipeline steps.

pub mod set;
pub mod value;

pub use set::{RecordSet, Row};
pub use value::ScalarValue;
