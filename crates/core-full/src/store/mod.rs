pub mod pg;
pub mod sql;

pub use pg::PgStore;
