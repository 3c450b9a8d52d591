use std::fmt;

use compact_str::CompactString;

use crate::reader::EncodingUsed;

/// Extension recorded for files outside the supported set.
pub const UNSUPPORTED_EXTENSION: &str = "unsupported";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Valid,
    EmptyFile,
    UnreadableFile,
    UnsupportedType,
}

impl FileStatus {
    /// Reason shown in the summary's warnings section.
    pub fn reason(self) -> &'static str {
        match self {
            FileStatus::Valid => "valid",
            FileStatus::EmptyFile => "empty file",
            FileStatus::UnreadableFile => "unreadable file",
            FileStatus::UnsupportedType => "unsupported file type",
        }
    }
}

/// Validation result for one scanned file. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: CompactString,
    /// Lower-cased supported extension (".txt") or [`UNSUPPORTED_EXTENSION`].
    pub extension: CompactString,
    pub size_bytes: u64,
    /// 0 when empty or unreadable
    pub line_count: u64,
    pub encoding_used: EncodingUsed,
    pub status: FileStatus,
}

impl FileRecord {
    pub fn is_valid(&self) -> bool {
        self.status == FileStatus::Valid
    }
}

/// Precondition failure concerning the whole input folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderError {
    NotFound,
    NotADirectory,
    NotAccessible,
    Empty,
    NoSupportedFiles,
    NoValidFiles,
}

impl fmt::Display for FolderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FolderError::NotFound => "input folder does not exist",
            FolderError::NotADirectory => "input path is not a directory",
            FolderError::NotAccessible => "input folder is not accessible",
            FolderError::Empty => "input folder is empty - no files found",
            FolderError::NoSupportedFiles => "no files with a supported extension",
            FolderError::NoValidFiles => {
                "no valid files found (all files are empty or unreadable)"
            }
        };
        f.write_str(text)
    }
}

/// Result of validating an entire folder.
///
/// When `folder_error` is set `valid_records` is empty, and so is
/// `rejected_records` except for [`FolderError::NoValidFiles`], which keeps
/// the rejected files for the log. Otherwise `valid_records` holds at
/// least one record.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid_records: Vec<FileRecord>,
    pub rejected_records: Vec<FileRecord>,
    pub folder_error: Option<FolderError>,
}

impl ValidationOutcome {
    pub fn failed(error: FolderError) -> Self {
        Self {
            folder_error: Some(error),
            ..Self::default()
        }
    }
}
