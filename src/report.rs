//! Summary report rendering.
//!
//! The report body holds no wall-clock data so that two runs over the same
//! folder produce identical text. Sections are sorted by extension and by
//! file name rather than listing order.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuditError;
use crate::stats::AggregateStats;
use crate::validate::types::{FileRecord, FileStatus};

/// File name of the report inside the output folder.
pub const SUMMARY_FILE_NAME: &str = "summary.txt";

const WIDTH: usize = 80;

/// Format bytes into a human-readable size string, scaling by 1024.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} B", bytes as f64)
    }
}

/// Format an integer with comma thousands separators ("1,234,567").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render the summary document.
pub fn render_summary(
    input_folder: &Path,
    stats: &AggregateStats,
    valid: &[FileRecord],
    rejected: &[FileRecord],
) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{heavy}\nFOLDER AUDIT - SUMMARY REPORT\n{heavy}\n");
    let _ = writeln!(out, "Input Folder: {}\n", input_folder.display());

    let _ = writeln!(out, "{light}\nOVERALL STATISTICS\n{light}");
    let _ = writeln!(out, "Total Valid Files: {}", format_count(stats.total_files));
    let _ = writeln!(out, "Total Size: {}", format_size(stats.total_bytes));
    let _ = writeln!(out, "Total Lines: {}\n", format_count(stats.total_lines));

    let _ = writeln!(out, "{light}\nSTATISTICS BY FILE TYPE\n{light}");
    let _ = writeln!(out, "{:<12}{:>8}{:>16}{:>14}", "Type", "Files", "Size", "Lines");
    let mut groups: Vec<_> = stats.by_extension.iter().collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    for (ext, group) in groups {
        let _ = writeln!(
            out,
            "{:<12}{:>8}{:>16}{:>14}",
            ext.to_uppercase(),
            format_count(group.count),
            format_size(group.bytes),
            format_count(group.lines)
        );
    }

    let _ = writeln!(out, "\n{light}\nFILE DETAILS\n{light}");
    let mut files: Vec<&FileRecord> = valid.iter().collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    for file in files {
        let _ = writeln!(out, "\n{}", file.name);
        let _ = writeln!(out, "  Size: {}", format_size(file.size_bytes));
        let _ = writeln!(out, "  Lines: {}", format_count(file.line_count));
        let _ = writeln!(out, "  Type: {}", file.extension);
        let _ = writeln!(out, "  Encoding: {}", file.encoding_used.label());
    }

    if !rejected.is_empty() {
        let _ = writeln!(out, "\n{light}\nWARNINGS\n{light}");
        for (title, status) in [
            ("Empty Files", FileStatus::EmptyFile),
            ("Unreadable Files", FileStatus::UnreadableFile),
            ("Unsupported Files", FileStatus::UnsupportedType),
        ] {
            let mut names: Vec<&str> = rejected
                .iter()
                .filter(|r| r.status == status)
                .map(|r| r.name.as_str())
                .collect();
            if names.is_empty() {
                continue;
            }
            names.sort_unstable();
            let _ = writeln!(out, "\n{} ({}):", title, names.len());
            for name in names {
                let _ = writeln!(out, "  - {} ({})", name, status.reason());
            }
        }
    }

    let _ = writeln!(out, "\n{heavy}\nEND OF REPORT\n{heavy}");
    out
}

/// Write the rendered summary into `dir`.
pub fn write_summary(dir: &Path, body: &str) -> Result<PathBuf, AuditError> {
    let path = dir.join(SUMMARY_FILE_NAME);
    fs::write(&path, body).map_err(|source| AuditError::Summary {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::EncodingUsed;
    use crate::stats::aggregate;

    fn record(name: &str, ext: &str, size: u64, lines: u64, status: FileStatus) -> FileRecord {
        FileRecord {
            name: name.into(),
            extension: ext.into(),
            size_bytes: size,
            line_count: lines,
            encoding_used: if status == FileStatus::Valid {
                EncodingUsed::Primary
            } else {
                EncodingUsed::Unreadable
            },
            status,
        }
    }

    #[test]
    fn sizes_scale_by_1024_with_two_decimals() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(2 * 1024u64.pow(4)), "2.00 TB");
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn report_has_all_sections_sorted() {
        let valid = vec![
            record("zeta.txt", ".txt", 2048, 1500, FileStatus::Valid),
            record("alpha.csv", ".csv", 10, 2, FileStatus::Valid),
        ];
        let rejected = vec![
            record("void.txt", ".txt", 0, 0, FileStatus::EmptyFile),
            record("pic.png", "unsupported", 9, 0, FileStatus::UnsupportedType),
        ];
        let stats = aggregate(&valid);
        let body = render_summary(Path::new("/in"), &stats, &valid, &rejected);

        assert!(body.contains("Input Folder: /in"));
        assert!(body.contains("Total Valid Files: 2"));
        assert!(body.contains("Total Size: 2.01 KB"));
        assert!(body.contains("Total Lines: 1,502"));
        assert!(body.find(".CSV").unwrap() < body.find(".TXT").unwrap());
        assert!(body.find("\nalpha.csv\n").unwrap() < body.find("\nzeta.txt\n").unwrap());
        assert!(body.contains("Empty Files (1):\n  - void.txt (empty file)"));
        assert!(body.contains("Unsupported Files (1):\n  - pic.png (unsupported file type)"));
        assert!(!body.contains("Unreadable Files"));
        assert!(body.ends_with(&format!("END OF REPORT\n{}\n", "=".repeat(80))));
    }

    #[test]
    fn no_warnings_section_without_rejections() {
        let valid = vec![record("a.txt", ".txt", 1, 1, FileStatus::Valid)];
        let body = render_summary(Path::new("/in"), &aggregate(&valid), &valid, &[]);
        assert!(!body.contains("WARNINGS"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let valid = vec![record("a.txt", ".txt", 1, 1, FileStatus::Valid)];
        let stats = aggregate(&valid);
        assert_eq!(
            render_summary(Path::new("/in"), &stats, &valid, &[]),
            render_summary(Path::new("/in"), &stats, &valid, &[])
        );
    }
}
