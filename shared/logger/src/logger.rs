//! Thread-safe, non-blocking logger.
//!
//! A [`Logger`] filters by level, tags records with an optional component
//! name, and forwards them to the console, to a file writer thread, or both.
//! Component loggers derived with [`Logger::for_component`] share the same
//! writer thread as their parent.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use crate::log_writer::spawn_writer;
use std::path::Path;
use std::sync::mpsc::Sender;

/// Cloneable logger handle.
///
/// # Examples
///
/// ```
/// use logging::{LogLevel, Logger};
///
/// let logger = Logger::console(LogLevel::Info);
/// let rtp = logger.for_component("RTP");
/// rtp.info("payloader ready");
/// rtp.debug("filtered out");
/// ```
#[derive(Clone)]
pub struct Logger {
    sender: Option<Sender<LogMessage>>,
    level: LogLevel,
    component: Option<String>,
    console_output: bool,
}

impl Logger {
    /// Creates a logger writing to `log_path` (created if missing).
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be opened or the writer thread
    /// cannot be spawned.
    pub fn new<P: AsRef<Path>>(log_path: P, level: LogLevel) -> Result<Self> {
        Self::with_outputs(Some(log_path.as_ref()), level, false)
    }

    /// Creates a logger with an optional file and optional console echo.
    pub fn with_outputs(
        log_path: Option<&Path>,
        level: LogLevel,
        console_output: bool,
    ) -> Result<Self> {
        let sender = match log_path {
            Some(path) => Some(spawn_writer(path)?),
            None => None,
        };
        Ok(Logger {
            sender,
            level,
            component: None,
            console_output,
        })
    }

    /// Creates a logger that only prints to stdout.
    pub fn console(level: LogLevel) -> Self {
        Logger {
            sender: None,
            level,
            component: None,
            console_output: true,
        }
    }

    /// Creates a logger that discards everything.
    pub fn null() -> Self {
        Logger {
            sender: None,
            level: LogLevel::Error,
            component: None,
            console_output: false,
        }
    }

    /// Derives a logger tagged with `component`, sharing this logger's outputs.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            sender: self.sender.clone(),
            level: self.level,
            component: Some(component.to_string()),
            console_output: self.console_output,
        }
    }

    /// Minimum level this logger records.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a record at `level` would reach any output.
    ///
    /// Lets callers skip building expensive messages.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level && (self.console_output || self.sender.is_some())
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }

        let msg = LogMessage::new(level, self.component.as_deref(), message);
        if self.console_output {
            print!("{}", msg.format());
        }
        if let Some(sender) = &self.sender {
            // Writer gone means the process is shutting down.
            let _ = sender.send(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn wait_for_write() {
        thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn test_logger_creates_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(&log_path, LogLevel::Debug).unwrap();
        logger.info("Test message");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("INFO: Test message"));
    }

    #[test]
    fn test_logger_respects_level() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(&log_path, LogLevel::Warn).unwrap();
        logger.trace("Trace message");
        logger.info("Info message");
        logger.warn("Warn message");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(!content.contains("Trace message"));
        assert!(!content.contains("Info message"));
        assert!(content.contains("Warn message"));
    }

    #[test]
    fn test_component_shares_writer() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(&log_path, LogLevel::Trace).unwrap();
        let payloader = logger.for_component("payloader");
        let handle = thread::spawn(move || payloader.trace("pushed 160 bytes"));
        handle.join().unwrap();
        logger.info("main");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("TRACE [payloader]: pushed 160 bytes"));
        assert!(content.contains("INFO: main"));
    }

    #[test]
    fn test_enabled() {
        let logger = Logger::console(LogLevel::Debug);
        assert!(logger.enabled(LogLevel::Debug));
        assert!(!logger.enabled(LogLevel::Trace));

        let null = Logger::null();
        assert!(!null.enabled(LogLevel::Error));
    }
}
