//! Internal log record.

use crate::log_level::LogLevel;
use chrono::Local;

/// A single formatted-on-demand log record.
#[derive(Debug, Clone)]
pub(crate) struct LogMessage {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl LogMessage {
    /// Creates a record stamped with the current local time.
    pub fn new(level: LogLevel, component: Option<&str>, message: &str) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            component: component.map(str::to_string),
            message: message.to_string(),
        }
    }

    /// Formats as `[timestamp] LEVEL [component]: message\n`.
    pub fn format(&self) -> String {
        match &self.component {
            Some(component) => format!(
                "[{}] {} [{}]: {}\n",
                self.timestamp,
                self.level.as_str(),
                component,
                self.message
            ),
            None => format!(
                "[{}] {}: {}\n",
                self.timestamp,
                self.level.as_str(),
                self.message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_message_format_with_component() {
        let msg = LogMessage::new(LogLevel::Debug, Some("payloader"), "flushed 160 bytes");
        let formatted = msg.format();

        assert!(formatted.contains("DEBUG [payloader]: flushed 160 bytes"));
        assert!(formatted.ends_with('\n'));
    }

    #[test]
    fn test_log_message_format_without_component() {
        let msg = LogMessage::new(LogLevel::Error, None, "sink closed");
        assert!(msg.format().contains("ERROR: sink closed"));
    }

    #[test]
    fn test_timestamp_format() {
        let msg = LogMessage::new(LogLevel::Info, None, "x");

        // YYYY-MM-DD HH:MM:SS.mmm
        assert_eq!(msg.timestamp.len(), 23);
        assert!(msg.timestamp.contains('.'));
    }
}
