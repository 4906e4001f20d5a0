// Public modules
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod rewrite;
pub mod transforms;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use output::{FileOutcome, FileReport, RunReport, RunSummary, TransformStats};
