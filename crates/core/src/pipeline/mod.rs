// Pipeline module - step engine and the ETL steps

pub mod builder;
pub mod core;
pub mod keys;
pub mod steps;

// Re-export core types
pub use builder::*;
pub use self::core::*;
pub use keys::*;
