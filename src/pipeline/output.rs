use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::AuditError;

/// Attempts at `name_1`, `name_2`, ... before giving up on a unique name.
const MAX_SUFFIX: u32 = 999;

/// Folder name for a run started at `at`, e.g. `output_20260112_093015`.
pub fn output_folder_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}{}", prefix, at.format("%Y%m%d_%H%M%S"))
}

/// Where output folders go when no explicit root is configured: beside
/// the input folder.
pub fn default_output_root(input_folder: &Path) -> PathBuf {
    match input_folder.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Create a fresh folder `root/name`, appending `_N` when a previous run
/// already took the name. Never reuses an existing folder.
pub fn create_output_folder(root: &Path, name: &str) -> Result<PathBuf, AuditError> {
    let mut candidate = root.join(name);
    let mut suffix = 0;
    loop {
        match fs::create_dir(&candidate) {
            Ok(()) => {
                tracing::debug!("Created output folder {}", candidate.display());
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && suffix < MAX_SUFFIX => {
                suffix += 1;
                candidate = root.join(format!("{}_{}", name, suffix));
            }
            Err(source) => {
                return Err(AuditError::OutputFolder {
                    path: candidate,
                    source,
                })
            }
        }
    }
}
