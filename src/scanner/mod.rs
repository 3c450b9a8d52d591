pub mod types;

use std::fs;
use std::io;
use std::path::Path;

use jwalk::{Parallelism, WalkDir};

use self::types::ScannedFile;
use crate::error::ScanError;

/// List the regular files directly inside `folder`, in directory order.
///
/// Subdirectories are skipped and file contents are never opened.
/// Symlinks count when they resolve to a regular file.
pub fn scan_folder(folder: &Path) -> Result<Vec<ScannedFile>, ScanError> {
    let meta = match fs::metadata(folder) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScanError::NotFound(folder.to_path_buf()));
        }
        Err(e) => return Err(classify(folder, e)),
    };
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(folder.to_path_buf()));
    }

    // jwalk reports an unreadable root as an item error; probe up front.
    fs::read_dir(folder).map_err(|e| classify(folder, e))?;

    let walk = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(Parallelism::Serial);

    let mut files = Vec::new();
    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unlistable entry in {}: {}", folder.display(), e);
                continue;
            }
        };

        let file_type = entry.file_type();
        let path = entry.path();
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if !is_file {
            tracing::debug!("Skipping non-file entry {}", path.display());
            continue;
        }
        files.push(ScannedFile::new(path));
    }

    tracing::debug!("Scanned {}: {} file(s)", folder.display(), files.len());
    Ok(files)
}

fn classify(folder: &Path, source: io::Error) -> ScanError {
    let path = folder.to_path_buf();
    match source.kind() {
        io::ErrorKind::PermissionDenied => ScanError::NotAccessible { path, source },
        io::ErrorKind::NotFound => ScanError::NotFound(path),
        _ => ScanError::Io { path, source },
    }
}
