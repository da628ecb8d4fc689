//! Component-tagged, level-filtered logging shared across the workspace.
//!
//! File output is written by a dedicated thread so that hot paths such as
//! packetization never block on disk I/O.

pub mod error;
mod log_level;
mod log_message;
mod log_writer;
mod logger;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use logger::Logger;
