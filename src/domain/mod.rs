//! Domain layer for deploy-helper
//!
//! Stack file model, policy configuration and violation types.

pub mod errors;
pub mod models;

pub use errors::{DocumentError, DocumentResult};
