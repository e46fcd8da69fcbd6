//! Stack file input and output
//!
//! YAML in, YAML out, via serde_yaml. Mapping order is preserved.

pub mod emitter;
pub mod loader;

pub use emitter::{emit, render, OutputTarget};
pub use loader::{load_document, parse_document, InputSource};
