//! Payloader configuration
//!
//! [`TransportConstraints`] is what the slicing engine reads on every chunk.
//! [`PayloaderConfig`] is its on-disk JSON form together with logging setup.

use crate::codec::clock::{ClockTime, NSECS_PER_MSEC};
use crate::error::Result;
use logging::{LogLevel, Logger};
use serde::Deserialize;
use std::path::Path;

/// Limits imposed by payload negotiation and the network path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConstraints {
    /// RTP payload type written into every packet
    pub payload_type: u8,
    /// Maximum RTP packet size in bytes, header included
    pub mtu: usize,
    /// Lower bound on packet duration (0 = none)
    pub min_ptime: ClockTime,
    /// Upper bound on packet duration (None = unbounded)
    pub max_ptime: Option<ClockTime>,
    /// RTP clock ticks per second
    pub clock_rate: u32,
}

impl Default for TransportConstraints {
    fn default() -> Self {
        Self {
            payload_type: 0,  // PCMU
            mtu: 1400,        // leaves room for IP/UDP and tunnelling overhead
            min_ptime: 0,     // no lower bound
            max_ptime: None,  // no upper bound
            clock_rate: 8000, // narrowband telephony
        }
    }
}

/// Transport section of the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub payload_type: u8,
    pub mtu: usize,
    pub min_ptime_ms: u64,
    pub max_ptime_ms: Option<u64>,
    pub clock_rate: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let defaults = TransportConstraints::default();
        Self {
            payload_type: defaults.payload_type,
            mtu: defaults.mtu,
            min_ptime_ms: 0,
            max_ptime_ms: None,
            clock_rate: defaults.clock_rate,
        }
    }
}

impl From<&TransportConfig> for TransportConstraints {
    fn from(config: &TransportConfig) -> Self {
        Self {
            payload_type: config.payload_type,
            mtu: config.mtu,
            min_ptime: config.min_ptime_ms.saturating_mul(NSECS_PER_MSEC),
            max_ptime: config
                .max_ptime_ms
                .map(|ms| ms.saturating_mul(NSECS_PER_MSEC)),
            clock_rate: config.clock_rate,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file_path: String,
    pub log_level: String,
    pub enable_console: bool,
    pub enable_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_file_path: "payloader.log".to_string(),
            log_level: "info".to_string(),
            enable_console: true,
            enable_file: false,
        }
    }
}

impl LoggingConfig {
    /// Builds a logger tagged with `component`.
    pub fn build_logger(&self, component: &str) -> Result<Logger> {
        let level: LogLevel = self.log_level.parse().unwrap_or(LogLevel::Info);
        let file = self.enable_file.then(|| Path::new(&self.log_file_path));
        let logger = Logger::with_outputs(file, level, self.enable_console)?;
        Ok(logger.for_component(component))
    }
}

/// Complete payloader configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PayloaderConfig {
    pub transport: TransportConfig,
    pub logging: LoggingConfig,
}

impl PayloaderConfig {
    /// Default file name searched for by [`PayloaderConfig::find`].
    pub const FILE_NAME: &'static str = "payloader.json";

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = config_loader::load_config_file(path)?;
        Self::from_json(&content)
    }

    /// Locate `payloader.json` (see [`config_loader::find_config_file`]) and load it.
    pub fn find() -> Result<Self> {
        let content = config_loader::find_and_load(Self::FILE_NAME)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn constraints(&self) -> TransportConstraints {
        TransportConstraints::from(&self.transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayloaderError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_constraints() {
        let constraints = PayloaderConfig::default().constraints();
        assert_eq!(constraints, TransportConstraints::default());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PayloaderConfig::from_json(
            r#"{"transport": {"payload_type": 8, "max_ptime_ms": 40, "min_ptime_ms": 20}}"#,
        )
        .unwrap();
        let constraints = config.constraints();

        assert_eq!(constraints.payload_type, 8);
        assert_eq!(constraints.mtu, 1400);
        assert_eq!(constraints.max_ptime, Some(40 * NSECS_PER_MSEC));
        assert_eq!(constraints.min_ptime, 20 * NSECS_PER_MSEC);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_from_json_invalid() {
        let result = PayloaderConfig::from_json(r#"{"transport": {"mtu": "big"}}"#);
        assert!(matches!(result, Err(PayloaderError::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payloader.json");
        fs::write(
            &path,
            r#"{
                "transport": {"mtu": 412, "clock_rate": 16000},
                "logging": {"log_level": "debug", "enable_console": false}
            }"#,
        )
        .unwrap();

        let config = PayloaderConfig::load_from_file(&path).unwrap();
        assert_eq!(config.transport.mtu, 412);
        assert_eq!(config.transport.clock_rate, 16000);
        assert_eq!(config.transport.max_ptime_ms, None);

        let logger = config.logging.build_logger("payloader").unwrap();
        assert_eq!(logger.level(), LogLevel::Debug);
    }

    #[test]
    fn test_load_missing_file() {
        let result = PayloaderConfig::load_from_file("/no/such/payloader.json");
        assert!(matches!(result, Err(PayloaderError::Config(_))));
    }

    #[test]
    fn test_build_logger_with_file() {
        let dir = tempdir().unwrap();
        let logging = LoggingConfig {
            log_file_path: dir.path().join("p.log").display().to_string(),
            log_level: "warn".to_string(),
            enable_console: false,
            enable_file: true,
        };

        let logger = logging.build_logger("payloader").unwrap();
        assert!(logger.enabled(LogLevel::Warn));
        assert!(!logger.enabled(LogLevel::Info));
        assert!(dir.path().join("p.log").exists());
    }
}
