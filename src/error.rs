use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why the input folder could not be listed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("input folder does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("no read permission for folder: {}", .path.display())]
    NotAccessible { path: PathBuf, source: io::Error },

    #[error("failed to list {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Faults that end a run on the system-error path.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to create output folder {}: {source}", .path.display())]
    OutputFolder { path: PathBuf, source: io::Error },

    #[error("failed to write summary {}: {source}", .path.display())]
    Summary { path: PathBuf, source: io::Error },

    #[error("failed to write log file: {0}")]
    LogWrite(#[source] io::Error),

    #[error("unexpected failure while listing the input folder: {0}")]
    Listing(#[source] ScanError),

    #[error("internal fault: {0}")]
    Panic(String),
}
