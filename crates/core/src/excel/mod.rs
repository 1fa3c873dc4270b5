pub mod parser;

pub use parser::ExcelParser;
