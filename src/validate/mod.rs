pub mod types;

use std::fs;
use std::io;

use compact_str::CompactString;

use self::types::{FileRecord, FileStatus, FolderError, ValidationOutcome, UNSUPPORTED_EXTENSION};
use crate::config::AuditConfig;
use crate::log::Logger;
use crate::reader::{self, EncodingUsed};
use crate::scanner::types::ScannedFile;

/// Validate one scanned file.
///
/// Never fails: I/O problems on this file become `UnreadableFile` and a
/// Warning on `log`, so the caller can move on to the next file.
pub fn validate_file(file: &ScannedFile, config: &AuditConfig, log: &mut Logger) -> FileRecord {
    let extension = file.extension();

    if !config.is_supported(&extension) {
        log.warning(format!("Skipping unsupported file type: {}", file.name));
        let size = fs::metadata(&file.path).map(|m| m.len()).unwrap_or(0);
        return rejected(file, CompactString::new(UNSUPPORTED_EXTENSION), size, FileStatus::UnsupportedType);
    }

    match read_supported(file, extension.clone(), config, log) {
        Ok(record) => record,
        Err(e) => {
            log.warning(format!("Error processing {}: {}", file.name, e));
            rejected(file, extension, 0, FileStatus::UnreadableFile)
        }
    }
}

fn read_supported(
    file: &ScannedFile,
    extension: CompactString,
    config: &AuditConfig,
    log: &mut Logger,
) -> io::Result<FileRecord> {
    let size = fs::metadata(&file.path)?.len();
    if size == 0 {
        log.warning(format!("Empty file: {}", file.name));
        return Ok(rejected(file, extension, 0, FileStatus::EmptyFile));
    }

    let outcome = reader::read_text(&file.path, config.binary_control_ratio, log)?;
    if outcome.encoding == EncodingUsed::Unreadable {
        return Ok(rejected(file, extension, size, FileStatus::UnreadableFile));
    }

    Ok(FileRecord {
        name: file.name.clone(),
        extension,
        size_bytes: size,
        line_count: outcome.line_count,
        encoding_used: outcome.encoding,
        status: FileStatus::Valid,
    })
}

fn rejected(file: &ScannedFile, extension: CompactString, size: u64, status: FileStatus) -> FileRecord {
    FileRecord {
        name: file.name.clone(),
        extension,
        size_bytes: size,
        line_count: 0,
        encoding_used: EncodingUsed::Unreadable,
        status,
    }
}

/// Validate every file in listing order, then apply the folder rules.
///
/// `should_stop` is sampled before each file; returns `None` when it fires.
pub fn validate_folder(
    files: &[ScannedFile],
    config: &AuditConfig,
    log: &mut Logger,
    should_stop: impl Fn() -> bool,
) -> Option<ValidationOutcome> {
    let mut records = Vec::with_capacity(files.len());
    for file in files {
        if should_stop() {
            return None;
        }
        records.push(validate_file(file, config, log));
    }
    Some(classify_folder(records))
}

/// Fold per-file records into the folder-level outcome.
pub fn classify_folder(records: Vec<FileRecord>) -> ValidationOutcome {
    if records.is_empty() {
        return ValidationOutcome::failed(FolderError::Empty);
    }
    if records.iter().all(|r| r.status == FileStatus::UnsupportedType) {
        return ValidationOutcome::failed(FolderError::NoSupportedFiles);
    }

    let (valid_records, rejected_records): (Vec<_>, Vec<_>) =
        records.into_iter().partition(FileRecord::is_valid);

    let folder_error = valid_records.is_empty().then_some(FolderError::NoValidFiles);
    ValidationOutcome {
        valid_records,
        rejected_records,
        folder_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogLevel;
    use std::path::Path;

    fn scanned(dir: &Path, name: &str, bytes: &[u8]) -> ScannedFile {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        ScannedFile::new(path)
    }

    #[test]
    fn unsupported_extension_is_not_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = scanned(dir.path(), "image.png", &[0x89, b'P', b'N', b'G']);
        let mut log = Logger::silent();

        let record = validate_file(&file, &AuditConfig::default(), &mut log);
        assert_eq!(record.status, FileStatus::UnsupportedType);
        assert_eq!(record.extension, UNSUPPORTED_EXTENSION);
        assert_eq!(record.size_bytes, 4);
        assert_eq!(log.count(LogLevel::Warning), 1);
    }

    #[test]
    fn extension_match_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let file = scanned(dir.path(), "DATA.JSON", b"{}\n");
        let record = validate_file(&file, &AuditConfig::default(), &mut Logger::silent());
        assert_eq!(record.status, FileStatus::Valid);
        assert_eq!(record.extension, ".json");
        assert_eq!(record.line_count, 1);
        assert_eq!(record.encoding_used, EncodingUsed::Primary);
    }

    #[test]
    fn zero_byte_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = scanned(dir.path(), "blank.txt", b"");
        let record = validate_file(&file, &AuditConfig::default(), &mut Logger::silent());
        assert_eq!(record.status, FileStatus::EmptyFile);
        assert_eq!(record.line_count, 0);
    }

    #[test]
    fn vanished_file_becomes_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let file = scanned(dir.path(), "gone.txt", b"x");
        fs::remove_file(&file.path).unwrap();
        let mut log = Logger::silent();

        let record = validate_file(&file, &AuditConfig::default(), &mut log);
        assert_eq!(record.status, FileStatus::UnreadableFile);
        assert_eq!(log.count(LogLevel::Warning), 1);
    }

    #[test]
    fn folder_rules() {
        assert_eq!(classify_folder(vec![]).folder_error, Some(FolderError::Empty));

        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig::default();
        let mut log = Logger::silent();

        let only_unsupported = vec![
            scanned(dir.path(), "a.md", b"# a"),
            scanned(dir.path(), "b", b"b"),
        ];
        let outcome = validate_folder(&only_unsupported, &config, &mut log, || false).unwrap();
        assert_eq!(outcome.folder_error, Some(FolderError::NoSupportedFiles));
        assert!(outcome.rejected_records.is_empty());

        let only_empty = vec![
            scanned(dir.path(), "c.txt", b""),
            scanned(dir.path(), "d.csv", b""),
            scanned(dir.path(), "e.md", b"e"),
        ];
        let outcome = validate_folder(&only_empty, &config, &mut log, || false).unwrap();
        assert_eq!(outcome.folder_error, Some(FolderError::NoValidFiles));
        assert!(outcome.valid_records.is_empty());
        assert_eq!(outcome.rejected_records.len(), 3);
        assert_eq!(outcome.rejected_records[0].status, FileStatus::EmptyFile);
        assert_eq!(outcome.rejected_records[1].status, FileStatus::EmptyFile);
    }

    #[test]
    fn valid_and_rejected_keep_listing_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            scanned(dir.path(), "b.txt", b"b\n"),
            scanned(dir.path(), "x.txt", b""),
            scanned(dir.path(), "a.csv", b"a,b\n1,2\n"),
        ];
        let outcome =
            validate_folder(&files, &AuditConfig::default(), &mut Logger::silent(), || false)
                .unwrap();

        assert_eq!(outcome.folder_error, None);
        let valid: Vec<&str> = outcome.valid_records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(valid, vec!["b.txt", "a.csv"]);
        assert_eq!(outcome.rejected_records[0].name, "x.txt");
    }

    #[test]
    fn stop_request_is_honoured_between_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![scanned(dir.path(), "a.txt", b"a")];
        let outcome =
            validate_folder(&files, &AuditConfig::default(), &mut Logger::silent(), || true);
        assert!(outcome.is_none());
    }
}
