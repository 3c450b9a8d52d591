/// Pipeline inspection tool
/// Runs Scanner → Validator → Aggregator against a folder and prints each
/// stage without creating an output folder
use folder_audit::config::AuditConfig;
use folder_audit::log::{LogLevel, Logger};
use folder_audit::report::{format_count, format_size};
use folder_audit::scanner;
use folder_audit::stats;
use folder_audit::validate;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folder_audit=debug".parse()?),
        )
        .init();

    let folder = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              FOLDER-AUDIT PIPELINE INSPECTOR                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Target: {}", folder.display());
    println!();

    // === STAGE 1: SCANNER ===
    println!("┌─ STAGE 1: SCANNER ─────────────────────────────────────────┐");
    let start = std::time::Instant::now();
    let files = scanner::scan_folder(&folder)?;
    println!("  ✓ Listed {} file(s) in {:.2}ms", files.len(), start.elapsed().as_secs_f64() * 1000.0);
    for file in &files {
        println!("    {} [{}]", file.name, file.extension());
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 2: VALIDATION ===
    println!("┌─ STAGE 2: VALIDATION ──────────────────────────────────────┐");
    let config = AuditConfig::default();
    let mut log = Logger::silent();
    let Some(outcome) = validate::validate_folder(&files, &config, &mut log, || false) else {
        println!("  ✗ Validation stopped");
        return Ok(());
    };
    for record in outcome.valid_records.iter().chain(&outcome.rejected_records) {
        println!(
            "  {} {:<32} {:?} ({}, {} lines)",
            if record.is_valid() { "✓" } else { "✗" },
            record.name,
            record.status,
            record.encoding_used.label(),
            record.line_count
        );
    }
    println!("  Warnings logged: {}", log.count(LogLevel::Warning));
    if let Some(error) = outcome.folder_error {
        println!("  ✗ FAILED: {}", error);
        println!("└────────────────────────────────────────────────────────────┘");
        return Ok(());
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 3: AGGREGATION ===
    println!("┌─ STAGE 3: AGGREGATION ─────────────────────────────────────┐");
    let totals = stats::aggregate(&outcome.valid_records);
    println!(
        "  ✓ {} file(s), {}, {} line(s)",
        totals.total_files,
        format_size(totals.total_bytes),
        format_count(totals.total_lines)
    );
    for (ext, group) in &totals.by_extension {
        println!(
            "    {:<8} {:>4} file(s) {:>12} {:>10} lines",
            ext,
            group.count,
            format_size(group.bytes),
            format_count(group.lines)
        );
    }
    println!("└────────────────────────────────────────────────────────────┘");

    Ok(())
}
