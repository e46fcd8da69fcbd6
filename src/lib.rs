//! deploy-helper - Docker Swarm stack file policy gate
//!
//! Reads a stack file, checks it against organisational deployment policy
//! (shared proxy network, routing labels), injects metadata labels and a
//! log shipping configuration, and writes the result for the deploy stage.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): stack file model, policy and violations
//! - **Service Layer** (`services`): validator, injectors and the pipeline
//! - **Infrastructure Layer** (`infrastructure`): YAML I/O, config, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use deploy_helper::infrastructure::document::parse_document;
//! use deploy_helper::{CiEnvironment, Pipeline, PipelineOptions, PolicyConfig};
//!
//! let doc = parse_document(&std::fs::read_to_string("stack.yml")?)?;
//! let pipeline = Pipeline::new(PolicyConfig::default(), env, PipelineOptions::default());
//! let outcome = pipeline.process(doc)?;
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    CiEnvironment, DeploymentDocument, LoggingBackend, PolicyConfig, ValidationReport, Violation,
    ViolationKind,
};
pub use domain::DocumentError;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Pipeline, PipelineError, PipelineOptions, PipelineOutcome};
