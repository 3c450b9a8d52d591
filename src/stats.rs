use compact_str::CompactString;

use crate::validate::types::FileRecord;

/// Per-extension sub-aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionStats {
    pub count: u64,
    pub bytes: u64,
    pub lines: u64,
}

impl ExtensionStats {
    fn add(&mut self, record: &FileRecord) {
        self.count += 1;
        self.bytes += record.size_bytes;
        self.lines += record.line_count;
    }
}

/// Totals over the valid records, plus a breakdown by extension in the
/// order extensions were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total_files: u64,
    pub total_bytes: u64,
    pub total_lines: u64,
    pub by_extension: Vec<(CompactString, ExtensionStats)>,
}

impl AggregateStats {
    pub fn extension(&self, ext: &str) -> Option<&ExtensionStats> {
        self.by_extension
            .iter()
            .find(|(e, _)| e.as_str() == ext)
            .map(|(_, s)| s)
    }
}

/// Fold valid records into [`AggregateStats`].
pub fn aggregate(records: &[FileRecord]) -> AggregateStats {
    let mut stats = AggregateStats::default();
    for record in records {
        stats.total_files += 1;
        stats.total_bytes += record.size_bytes;
        stats.total_lines += record.line_count;

        // Few distinct extensions, so a linear lookup keeps first-seen order cheaply.
        match stats
            .by_extension
            .iter_mut()
            .find(|(e, _)| *e == record.extension)
        {
            Some((_, group)) => group.add(record),
            None => {
                let mut group = ExtensionStats::default();
                group.add(record);
                stats.by_extension.push((record.extension.clone(), group));
            }
        }
    }
    stats
}
