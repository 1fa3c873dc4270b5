//! Core of the spreadsheet-to-database loader: the record model, the
//! enrichment transforms, the incremental loader and the step pipeline that
//! ties them together. Infrastructure lives behind the traits in [`store`].

pub mod config;
pub mod error;
pub mod excel;
pub mod load;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod transform;
pub mod usecase;

pub use error::{Result, SheetloadError};
pub use record::{RecordSet, Row, ScalarValue};
