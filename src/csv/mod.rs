//! CSV line splitting

mod parser;

pub use parser::{is_blank, split_fields, split_plain, FieldSplitter};
