//! Application use cases built from the transforms and collaborators.

pub mod prepare;

pub use prepare::{LookupConfig, PrepareRecords};
