//! Logging infrastructure
//!
//! Structured diagnostics using tracing and tracing-subscriber, always on
//! stderr so stdout stays a clean stack file.

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat};
pub use logger::LoggerImpl;
