//! Policy configuration management
//!
//! Hierarchical configuration using figment:
//! - Built-in organisational defaults
//! - Optional YAML policy file
//! - Environment variable overrides
//! - Validation

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};
