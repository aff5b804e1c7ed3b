//! Logging for codec, cache and lifecycle events
//!
//! Entries go through the `Logger` installed with `Runtime::set_logger`
//! (colored console output until one is installed). Error entries carry the
//! file and line of the `ctr_error!` / `ctr_err!` / `ctr_bail!` call site.

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Destination for log entries
///
/// Implement it to send entries to a file or to the editor console.
///
/// # Example
///
/// ```no_run
/// use ctr_resource_sync::ctr::log::{Logger, LogEntry};
///
/// struct ConsoleWindowLogger;
///
/// impl Logger for ConsoleWindowLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Push to the editor console...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Record one entry
    fn log(&self, entry: &LogEntry);
}

/// One log message with its metadata
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// How serious the event is
    pub severity: LogSeverity,

    /// When the entry was emitted
    pub timestamp: SystemTime,

    /// Source module (e.g., "ctr::Runtime", "ctr::TextureFolder")
    pub source: String,

    /// Formatted message
    pub message: String,

    /// Call-site file (error entries only)
    pub file: Option<&'static str>,

    /// Call-site line (error entries only)
    pub line: Option<u32>,
}

impl LogEntry {
    /// Render the entry as plain text, without colors
    ///
    /// Format: `[timestamp] [SEVERITY] [source] message (file:line)`
    pub fn to_plain_string(&self) -> String {
        let datetime: DateTime<Local> = self.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");
        match (self.file, self.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, self.severity.label(), self.source, self.message, file, line
            ),
            _ => format!(
                "[{}] [{}] [{}] {}",
                timestamp, self.severity.label(), self.source, self.message
            ),
        }
    }
}

/// Severity of a log entry, ordered from least to most serious
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose tier-level tracing
    Trace,

    /// Per-operation details (batch planning, image I/O)
    Debug,

    /// Lifecycle events (import, replace, rename, remove)
    Info,

    /// Potential issues (no-op removals, shadowed names)
    Warn,

    /// Failed operations (with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in console output
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Colored stdout logger used until another one is installed
///
/// Colors: Trace bright black, Debug cyan, Info green, Warn yellow, Error bold red.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let label = entry.severity.label();
        let severity_str = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

/// Logger wrapper that drops entries below a minimum severity
pub struct FilteredLogger<L: Logger> {
    inner: L,
    min_severity: LogSeverity,
}

impl<L: Logger> FilteredLogger<L> {
    /// Wrap `inner`, forwarding only entries with `severity >= min_severity`
    pub fn new(inner: L, min_severity: LogSeverity) -> Self {
        Self { inner, min_severity }
    }

    /// Minimum forwarded severity
    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }
}

impl<L: Logger> Logger for FilteredLogger<L> {
    fn log(&self, entry: &LogEntry) {
        if entry.severity >= self.min_severity {
            self.inner.log(entry);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (tier-level detail)
#[macro_export]
macro_rules! ctr_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::ctr::Runtime::log(
            $crate::ctr::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! ctr_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::ctr::Runtime::log(
            $crate::ctr::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
///
/// # Example
///
/// ```ignore
/// ctr_info!("ctr::TextureFolder", "Imported '{}'", name);
/// ```
#[macro_export]
macro_rules! ctr_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::ctr::Runtime::log(
            $crate::ctr::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! ctr_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::ctr::Runtime::log(
            $crate::ctr::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! ctr_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::ctr::Runtime::log_detailed(
            $crate::ctr::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an error (with file:line) and evaluate to it
///
/// Meant for `map_err` / `ok_or_else` closures.
///
/// ```ignore
/// let guard = lock.lock().map_err(|_| ctr_err!("ctr::Runtime",
///     Error::BackendError("index lock poisoned".to_string())))?;
/// ```
#[macro_export]
macro_rules! ctr_err {
    ($source:expr, $err:expr) => {{
        let err: $crate::ctr::Error = $err;
        $crate::ctr::Runtime::log_detailed(
            $crate::ctr::log::LogSeverity::Error,
            $source,
            err.to_string(),
            file!(),
            line!()
        );
        err
    }};
}

/// Log an error (with file:line) and return it from the current function
///
/// ```ignore
/// if name.is_empty() {
///     ctr_bail!("ctr::TextureFolder", Error::InvalidName("empty name".to_string()));
/// }
/// ```
#[macro_export]
macro_rules! ctr_bail {
    ($source:expr, $err:expr) => {
        return Err($crate::ctr_err!($source, $err))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
