//! Run log: the ordered event stream written to `automation.log`.
//!
//! The logger is created once per run and handed to each stage by
//! reference. Recording never fails; persisting happens in [`Logger::flush`].

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File name of the persisted run log inside the output folder.
pub const LOG_FILE_NAME: &str = "automation.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable log entry.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Append-only collector of [`LogEvent`]s.
pub struct Logger {
    events: Vec<LogEvent>,
    /// Where recorded events are echoed; `None` collects only.
    console: Option<Box<dyn Write + Send>>,
}

impl Logger {
    /// A logger echoing to stdout.
    pub fn new() -> Self {
        Self::with_console(Box::new(io::stdout()))
    }

    /// A logger echoing to `console`. Write errors on it are ignored.
    pub fn with_console(console: Box<dyn Write + Send>) -> Self {
        Self {
            events: Vec::new(),
            console: Some(console),
        }
    }

    /// A logger that only collects, for tests and the diagnostic binary.
    pub fn silent() -> Self {
        Self {
            events: Vec::new(),
            console: None,
        }
    }

    /// Append an event and echo it to the console.
    ///
    /// A closed or failing console (e.g. stdout piped into `head`) does
    /// not stop recording.
    pub fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        let event = self.stamp(level, message.into());
        if let Some(console) = self.console.as_mut() {
            let _ = writeln!(console, "{}", event).and_then(|_| console.flush());
        }
        self.push(event);
    }

    /// Drop all events so the logger can serve a new run.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Append an event to the log file only. Used for fault detail that
    /// must not reach the console.
    pub fn detail(&mut self, level: LogLevel, message: impl Into<String>) {
        let event = self.stamp(level, message.into());
        self.push(event);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Error, message);
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Number of recorded events at `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.events.iter().filter(|e| e.level == level).count()
    }

    /// Render every event, one per line, in recording order.
    pub fn render(&self) -> String {
        self.events
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write all events to `dir/automation.log`. Calling it again rewrites
    /// the file with the current content.
    pub fn flush(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(LOG_FILE_NAME);
        fs::write(&path, self.render())?;
        tracing::debug!("Flushed {} log events to {}", self.events.len(), path.display());
        Ok(path)
    }

    fn stamp(&self, level: LogLevel, message: String) -> LogEvent {
        LogEvent {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level,
            message,
        }
    }

    fn push(&mut self, event: LogEvent) {
        tracing::trace!("{} {}", event.level, event.message);
        self.events.push(event);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
