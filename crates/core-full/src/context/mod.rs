/// Settings module for core-full
pub mod config;

pub use config::{ExcelSettings, PgSettings, Settings, SettingsError};
