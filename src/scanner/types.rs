use std::path::PathBuf;

use compact_str::CompactString;

/// A regular file found directly inside the input folder.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name including extension
    pub name: CompactString,
}

impl ScannedFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name: CompactString::new(&name),
            path,
        }
    }

    /// Lower-cased extension including the dot (".txt"), or "" when absent.
    pub fn extension(&self) -> CompactString {
        match self.path.extension() {
            Some(ext) => {
                let mut lower = CompactString::new(".");
                lower.push_str(&ext.to_string_lossy().to_ascii_lowercase());
                lower
            }
            None => CompactString::new(""),
        }
    }
}
