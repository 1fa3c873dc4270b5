pub mod commands;
pub mod context;
pub mod io;
pub mod store;

// Re-export commonly used types
pub use context::{ExcelSettings, PgSettings, Settings};
pub use io::ExcelDirectorySource;
pub use store::PgStore;
