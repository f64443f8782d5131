pub mod constraint;
pub mod import;
pub mod parser;
pub mod value;

pub use constraint::*;
pub use import::*;
pub use parser::*;
pub use value::*;
