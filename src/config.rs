use std::path::PathBuf;

use compact_str::CompactString;

use crate::reader::BINARY_CONTROL_RATIO;

/// Extensions accepted for validation (compared case-insensitively).
/// Add an entry here to audit another text format.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".txt", ".csv", ".json"];

/// Prefix of the per-run output folder name.
pub const OUTPUT_PREFIX: &str = "output_";

/// Tunables for a single audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Lower-cased extensions including the leading dot.
    pub supported_extensions: Vec<CompactString>,
    /// Share of control bytes above which a fallback-decoded file is treated as binary.
    pub binary_control_ratio: f64,
    /// Where the output folder is created. `None` = beside the input folder.
    pub output_root: Option<PathBuf>,
    pub output_prefix: CompactString,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            supported_extensions: SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| CompactString::new(e))
                .collect(),
            binary_control_ratio: BINARY_CONTROL_RATIO,
            output_root: None,
            output_prefix: CompactString::new(OUTPUT_PREFIX),
        }
    }
}

impl AuditConfig {
    /// Whether `extension` (lower-cased, with dot) is in the supported set.
    pub fn is_supported(&self, extension: &str) -> bool {
        self.supported_extensions
            .iter()
            .any(|e| e.as_str() == extension)
    }

    /// Human-readable list for error messages, e.g. ".txt, .csv, .json".
    pub fn supported_list(&self) -> String {
        self.supported_extensions
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::AuditConfig;

    #[test]
    fn default_supports_the_three_text_formats() {
        let config = AuditConfig::default();
        assert!(config.is_supported(".txt"));
        assert!(config.is_supported(".csv"));
        assert!(config.is_supported(".json"));
        assert!(!config.is_supported(".md"));
        assert_eq!(config.supported_list(), ".txt, .csv, .json");
    }
}
