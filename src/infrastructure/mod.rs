//! Infrastructure layer module
//!
//! Adapters around the outside world:
//! - Stack file loading and emitting (serde_yaml)
//! - Policy configuration management (figment)
//! - Logging infrastructure (tracing)

pub mod config;
pub mod document;
pub mod logging;
