pub mod pipeline;
pub mod row;

pub use pipeline::{ImportError, ImportOptions, ImportSummary, import_file, import_reader};
