//! The single deploy-helper command: load, validate, inject, emit.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::Cli;
use crate::domain::models::{CiEnvironment, LoggingBackend};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::document::{emit, load_document, InputSource, OutputTarget};
use crate::services::{Pipeline, PipelineOptions, PipelineOutcome};

/// Summary printed by `--check`.
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub stack_file: String,
    pub main_services: Vec<String>,
    pub services: Vec<String>,
    pub logging_backend: LoggingBackend,
}

impl CheckOutput {
    fn from_outcome(stack_file: String, outcome: &PipelineOutcome, backend: LoggingBackend) -> Self {
        Self {
            stack_file,
            main_services: outcome.report.main_services.clone(),
            services: outcome.document.service_names(),
            logging_backend: backend,
        }
    }
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} is valid", self.stack_file)];
        lines.push(format!("  main services: {}", self.main_services.join(", ")));
        lines.push(format!(
            "  logging: {} for {} service(s)",
            self.logging_backend.driver(),
            self.services.len()
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let backend = cli.backend();
    let policy = ConfigLoader::load(cli.policy.as_deref()).context("Failed to load policy")?;

    let source = InputSource::from_arg(&cli.stack_file);
    let doc = load_document(&source)?;

    let pipeline = Pipeline::new(
        policy,
        CiEnvironment::from(cli.ci),
        PipelineOptions {
            skip_network_checks: cli.no_network_checks,
            backend,
        },
    );
    let outcome = pipeline.process(doc)?;

    if cli.check {
        let summary = CheckOutput::from_outcome(
            cli.stack_file.display().to_string(),
            &outcome,
            backend,
        );
        output(&summary, cli.json);
        return Ok(());
    }

    let target = cli.output.map_or(OutputTarget::Stdout, OutputTarget::File);
    emit(&outcome.document, &target)?;
    Ok(())
}
