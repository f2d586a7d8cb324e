//! SQL DDL interchange: import, export, and the shared splitting utility.

mod generator;
mod parser;
mod split;

pub use generator::generate_ddl;
pub use parser::{parse_ddl, Import, ImportError};
pub use split::smart_split;
