use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::Result;

use folder_audit::config::AuditConfig;
use folder_audit::log::LOG_FILE_NAME;
use folder_audit::pipeline::{ExitCode, Orchestrator, RunOutcome};
use folder_audit::report::SUMMARY_FILE_NAME;

/// `println!` that tolerates a closed stdout (EPIPE) instead of panicking.
macro_rules! say {
    ($($arg:tt)*) => {{
        let _ = writeln!(std::io::stdout().lock(), $($arg)*);
    }};
}

fn banner(title: &str) {
    say!("\n{}", "=".repeat(80));
    say!("{}", title);
    say!("{}\n", "=".repeat(80));
}

fn report_outcome(outcome: &RunOutcome) {
    match outcome.exit_code {
        ExitCode::Success => {
            banner("SUCCESS: Folder audit completed successfully!");
            if let Some(dir) = &outcome.output_folder {
                say!("Output location: {}", dir.display());
                say!("  - {}", SUMMARY_FILE_NAME);
                say!("  - {}\n", LOG_FILE_NAME);
            }
        }
        ExitCode::ValidationFailure => {
            say!("\nFAILED: Validation errors occurred. Check log for details.\n");
        }
        ExitCode::SystemError => {
            say!("\nFAILED: A system error occurred. Check log for details.\n");
        }
        ExitCode::Interrupted => {
            say!("\nOperation cancelled by user\n");
        }
    }
    if outcome.log_save_failed {
        say!("Failed to save log file");
    }
}

fn run() -> Result<i32> {
    // Diagnostics go to stderr; the run log owns stdout.
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folder_audit=warn".parse()?),
        )
        .init();

    // Panic text is internal detail; keep it off the console unless asked for.
    std::panic::set_hook(Box::new(|info| {
        tracing::debug!("panic: {}", info);
    }));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input] = args.as_slice() else {
        say!("Usage: folder-audit <input_folder>");
        say!("\nExample: folder-audit example_input");
        return Ok(ExitCode::ValidationFailure.code());
    };
    let input = PathBuf::from(input);

    banner("FOLDER AUDIT - Starting");

    let mut orchestrator = Orchestrator::new(AuditConfig::default());
    let cancel = orchestrator.cancel_flag();
    if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
        tracing::warn!("Interrupt handler unavailable: {}", e);
    }

    let outcome = orchestrator.run(&input);
    report_outcome(&outcome);
    Ok(outcome.exit_code.code())
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            say!("\nFATAL ERROR: the audit could not start\n");
            ExitCode::SystemError.code()
        }
    };
    std::process::exit(code);
}
