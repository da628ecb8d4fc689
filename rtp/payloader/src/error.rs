//! Payloader error types
//!
//! Configuration problems and downstream rejections are kept apart so callers
//! can tell a misconfigured codec adapter from a congested sink.

use crate::codec::audio::GeometryMode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PayloaderError>;

/// Boxed error reported by a downstream sink.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Payloader errors
#[derive(Debug, Error)]
pub enum PayloaderError {
    /// Data arrived before any geometry was set.
    #[error("payloader is not configured: no frame or sample geometry set")]
    Unconfigured,

    #[error("invalid {mode} geometry: {field} must be non-zero")]
    InvalidGeometry {
        mode: GeometryMode,
        field: &'static str,
    },

    /// Geometry mode is fixed once chosen.
    #[error("payloader is {current}-based and cannot switch to {requested}-based geometry")]
    ModeMismatch {
        current: GeometryMode,
        requested: GeometryMode,
    },

    #[error("MTU payload capacity of {capacity} bytes cannot hold one {align}-byte unit")]
    MtuTooSmall { capacity: usize, align: usize },

    #[error("invalid transport constraint: {field} must be non-zero")]
    InvalidConstraint { field: &'static str },

    /// Downstream rejected a packet; passed through untouched.
    #[error("sink rejected packet: {0}")]
    Sink(#[source] SinkError),

    #[error("RTP error: {0}")]
    Rtp(String),

    #[error(transparent)]
    Config(#[from] config_loader::ConfigError),

    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
}

impl PayloaderError {
    /// Wraps any downstream failure as [`PayloaderError::Sink`].
    pub fn sink<E: Into<SinkError>>(err: E) -> Self {
        PayloaderError::Sink(err.into())
    }

    /// True for errors caused by geometry or transport settings.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PayloaderError::Unconfigured
                | PayloaderError::InvalidGeometry { .. }
                | PayloaderError::ModeMismatch { .. }
                | PayloaderError::MtuTooSmall { .. }
                | PayloaderError::InvalidConstraint { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_geometry_display() {
        let err = PayloaderError::InvalidGeometry {
            mode: GeometryMode::Frame,
            field: "frame_duration",
        };
        assert_eq!(
            err.to_string(),
            "invalid frame geometry: frame_duration must be non-zero"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_mode_mismatch_display() {
        let err = PayloaderError::ModeMismatch {
            current: GeometryMode::Sample,
            requested: GeometryMode::Frame,
        };
        assert_eq!(
            err.to_string(),
            "payloader is sample-based and cannot switch to frame-based geometry"
        );
    }

    #[test]
    fn test_sink_error_keeps_source() {
        let err = PayloaderError::sink("queue full");

        assert_eq!(err.to_string(), "sink rejected packet: queue full");
        assert_eq!(err.source().unwrap().to_string(), "queue full");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_error_from_config_error() {
        let err: PayloaderError =
            config_loader::ConfigError::FileNotFound("p.json".to_string()).into();
        assert!(matches!(err, PayloaderError::Config(_)));
    }
}
