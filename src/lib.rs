// Public library interface for folder-audit
// The binaries and integration tests drive the pipeline through these modules

pub mod config;
pub mod error;
pub mod log;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod scanner;
pub mod stats;
pub mod validate;
