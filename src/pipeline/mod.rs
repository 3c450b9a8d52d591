//! Run orchestration: scan → validate → aggregate → report.
//!
//! Every stage returns its failure as a value. [`Orchestrator::run`] is the
//! single boundary that turns those values (and panics) into a
//! [`RunOutcome`] with an exit code, after a best-effort log flush.

pub mod output;

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::config::AuditConfig;
use crate::error::{AuditError, ScanError};
use crate::log::{LogLevel, Logger};
use crate::report;
use crate::scanner;
use crate::stats;
use crate::validate::{self, types::FileStatus, types::FolderError};

/// Shared flag set by the interrupt handler and sampled between files.
pub type CancelFlag = Arc<AtomicBool>;

/// Process exit status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    ValidationFailure,
    SystemError,
    Interrupted,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::ValidationFailure => 1,
            ExitCode::SystemError => 2,
            ExitCode::Interrupted => 130,
        }
    }
}

/// Pipeline state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Scanning,
    Validating,
    ValidationFailed,
    Aggregating,
    ReportGenerated,
    Done,
    Interrupted,
    Fatal,
}

/// What a run hands back to the process boundary.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub exit_code: ExitCode,
    /// Set only on success.
    pub output_folder: Option<PathBuf>,
    pub folder_error: Option<FolderError>,
    /// Where `automation.log` was written, if anywhere.
    pub log_path: Option<PathBuf>,
    pub log_save_failed: bool,
}

/// Why a run stopped early.
enum Halt {
    Folder(FolderError),
    Interrupted,
    Fatal(AuditError),
}

pub struct Orchestrator {
    config: AuditConfig,
    cancel: CancelFlag,
    log: Logger,
    stage: Stage,
    started_at: DateTime<Local>,
    input_folder: PathBuf,
    output_folder: Option<PathBuf>,
    #[cfg(test)]
    fault: Option<&'static str>,
}

impl Orchestrator {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
            log: Logger::new(),
            stage: Stage::Start,
            started_at: Local::now(),
            input_folder: PathBuf::new(),
            output_folder: None,
            #[cfg(test)]
            fault: None,
        }
    }

    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        Arc::clone(&self.cancel)
    }

    pub fn logger(&self) -> &Logger {
        &self.log
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the whole pipeline over `input_folder`. Never panics and never
    /// returns without having attempted to persist the log.
    ///
    /// Each call is a fresh run: its own output folder and its own log.
    /// The cancel flag is shared with the interrupt handler and kept as is.
    pub fn run(&mut self, input_folder: &Path) -> RunOutcome {
        self.started_at = Local::now();
        self.input_folder = input_folder.to_path_buf();
        self.output_folder = None;
        self.stage = Stage::Start;
        self.log.clear();
        self.log.info("Folder audit started");
        self.log.info(format!("Input folder: {}", input_folder.display()));

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.execute()));
        let flow = match result {
            Ok(flow) => flow,
            Err(payload) => Err(Halt::Fatal(AuditError::Panic(panic_message(&*payload)))),
        };
        self.finish(flow)
    }

    fn execute(&mut self) -> Result<PathBuf, Halt> {
        self.enter(Stage::Scanning)?;
        self.injected_fault();
        let input = self.input_folder.clone();
        self.log.info(format!("Scanning input folder: {}", input.display()));
        let files = scanner::scan_folder(&input).map_err(|e| self.scan_failed(e))?;
        self.log.info(format!("Found {} file(s) in input folder", files.len()));

        self.enter(Stage::Validating)?;
        let cancel = Arc::clone(&self.cancel);
        let outcome = validate::validate_folder(&files, &self.config, &mut self.log, || {
            cancel.load(Ordering::SeqCst)
        })
        .ok_or(Halt::Interrupted)?;

        if let Some(error) = outcome.folder_error {
            let message = match error {
                FolderError::NoSupportedFiles => format!(
                    "No valid files found. Supported extensions: {}",
                    self.config.supported_list()
                ),
                other => capitalize(&other.to_string()),
            };
            self.log.error(message);
            return Err(Halt::Folder(error));
        }

        for (status, label) in [
            (FileStatus::EmptyFile, "empty"),
            (FileStatus::UnreadableFile, "unreadable"),
            (FileStatus::UnsupportedType, "unsupported"),
        ] {
            let names: Vec<&str> = outcome
                .rejected_records
                .iter()
                .filter(|r| r.status == status)
                .map(|r| r.name.as_str())
                .collect();
            if !names.is_empty() {
                self.log.info(format!(
                    "Found {} {} file(s): {}",
                    names.len(),
                    label,
                    names.join(", ")
                ));
            }
        }
        self.log.success(format!(
            "Validation passed: {} valid file(s) found",
            outcome.valid_records.len()
        ));

        self.enter(Stage::Aggregating)?;
        let totals = stats::aggregate(&outcome.valid_records);
        self.log.info(format!(
            "Aggregated {} file(s) across {} type(s)",
            totals.total_files,
            totals.by_extension.len()
        ));

        let shown_path = std::fs::canonicalize(&input).unwrap_or_else(|_| input.clone());
        let body = report::render_summary(
            &shown_path,
            &totals,
            &outcome.valid_records,
            &outcome.rejected_records,
        );
        let dir = self.ensure_output_folder().map_err(Halt::Fatal)?;
        report::write_summary(&dir, &body).map_err(Halt::Fatal)?;
        self.log
            .success(format!("Summary generated: {}", report::SUMMARY_FILE_NAME));

        self.stage = Stage::ReportGenerated;
        Ok(dir)
    }

    #[cfg(test)]
    fn injected_fault(&self) {
        if let Some(fault) = self.fault {
            panic!("{}", fault);
        }
    }

    #[cfg(not(test))]
    fn injected_fault(&self) {}

    /// Move to `next`, honouring a pending interrupt first.
    fn enter(&mut self, next: Stage) -> Result<(), Halt> {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(Halt::Interrupted);
        }
        tracing::debug!("Stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
        Ok(())
    }

    fn scan_failed(&mut self, error: ScanError) -> Halt {
        match error {
            ScanError::NotFound(path) => {
                self.log
                    .error(format!("Input folder does not exist: {}", path.display()));
                Halt::Folder(FolderError::NotFound)
            }
            ScanError::NotADirectory(path) => {
                self.log
                    .error(format!("Path is not a directory: {}", path.display()));
                Halt::Folder(FolderError::NotADirectory)
            }
            ScanError::NotAccessible { path, source } => {
                self.log
                    .error(format!("No read permission for folder: {}", path.display()));
                self.log.detail(LogLevel::Error, format!("Listing failed: {}", source));
                Halt::Folder(FolderError::NotAccessible)
            }
            other @ ScanError::Io { .. } => Halt::Fatal(AuditError::Listing(other)),
        }
    }

    fn ensure_output_folder(&mut self) -> Result<PathBuf, AuditError> {
        if let Some(dir) = &self.output_folder {
            return Ok(dir.clone());
        }
        let root = match &self.config.output_root {
            Some(root) => root.clone(),
            None => {
                let input = std::fs::canonicalize(&self.input_folder)
                    .unwrap_or_else(|_| self.input_folder.clone());
                output::default_output_root(&input)
            }
        };
        let name = output::output_folder_name(&self.config.output_prefix, self.started_at);
        let dir = output::create_output_folder(&root, &name)?;
        self.log
            .info(format!("Created output folder: {}", dir.display()));
        self.output_folder = Some(dir.clone());
        Ok(dir)
    }

    fn finish(&mut self, flow: Result<PathBuf, Halt>) -> RunOutcome {
        let (exit_code, folder_error) = match &flow {
            Ok(_) => (ExitCode::Success, None),
            Err(Halt::Folder(e)) => {
                let code = if *e == FolderError::NotAccessible {
                    ExitCode::SystemError
                } else {
                    ExitCode::ValidationFailure
                };
                (code, Some(*e))
            }
            Err(Halt::Interrupted) => (ExitCode::Interrupted, None),
            Err(Halt::Fatal(_)) => (ExitCode::SystemError, None),
        };

        match &flow {
            Ok(_) => {
                self.stage = Stage::Done;
                self.log.info("Saving log file");
            }
            Err(Halt::Folder(_)) => {
                self.stage = Stage::ValidationFailed;
                self.log.error("Validation failed - exiting");
            }
            Err(Halt::Interrupted) => {
                self.stage = Stage::Interrupted;
                self.log.warning("Operation cancelled by user");
            }
            Err(Halt::Fatal(error)) => {
                self.stage = Stage::Fatal;
                tracing::debug!("Run aborted: {}", error);
                self.log.detail(LogLevel::Error, format!("Fault detail: {}", error));
                self.log
                    .error("An unexpected system error occurred; see the log for details");
            }
        }

        let (log_path, log_save_failed) = self.persist_log(&flow);
        RunOutcome {
            exit_code,
            output_folder: flow.ok(),
            folder_error,
            log_path,
            log_save_failed,
        }
    }

    /// Best-effort flush. Failures are reported through the outcome, never raised.
    fn persist_log(&mut self, flow: &Result<PathBuf, Halt>) -> (Option<PathBuf>, bool) {
        // Without a located input folder there is nowhere sensible to put output.
        let input_missing = matches!(
            flow,
            Err(Halt::Folder(FolderError::NotFound | FolderError::NotADirectory))
        );
        if input_missing && self.output_folder.is_none() {
            return (None, false);
        }
        if self.output_folder.is_none() && !self.input_folder.is_dir() {
            return (None, false);
        }

        let dir = match self.ensure_output_folder() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::debug!("Cannot persist log: {}", e);
                return (None, true);
            }
        };
        match self.log.flush(&dir) {
            Ok(path) => (Some(path), false),
            Err(e) => {
                tracing::debug!("Cannot persist log: {}", AuditError::LogWrite(e));
                (None, true)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
