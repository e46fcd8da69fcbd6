use thiserror::Error;
use tracing::{info, instrument};

use super::injector::{Injector, LabelInjector, LoggingInjector};
use super::validator::{PolicyValidator, ValidateOptions};
use crate::domain::models::{
    CiEnvironment, DeploymentDocument, LoggingBackend, PolicyConfig, ValidationReport,
};
use crate::domain::DocumentError;

/// Why a run produced no document.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Errors found:\n{0}")]
    Violations(ValidationReport),
}

/// Switches taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub skip_network_checks: bool,
    pub backend: LoggingBackend,
}

/// A successfully transformed stack file.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub document: DeploymentDocument,
    pub report: ValidationReport,
    pub labels_injected: usize,
    pub logging_configured: usize,
}

/// Validate then inject, all or nothing.
///
/// Policy and environment problems are gathered into one report. Nothing
/// is injected unless that report is clean, so a service that failed a
/// check is never rewritten.
#[derive(Debug, Clone)]
pub struct Pipeline {
    policy: PolicyConfig,
    env: CiEnvironment,
    options: PipelineOptions,
}

impl Pipeline {
    pub const fn new(policy: PolicyConfig, env: CiEnvironment, options: PipelineOptions) -> Self {
        Self {
            policy,
            env,
            options,
        }
    }

    #[instrument(skip_all, fields(backend = ?self.options.backend))]
    pub fn process(&self, mut doc: DeploymentDocument) -> Result<PipelineOutcome, PipelineError> {
        let validator = PolicyValidator::new(
            &self.policy,
            ValidateOptions {
                skip_network_checks: self.options.skip_network_checks,
                project_name: self.env.project_name().map(str::to_string),
            },
        );
        let mut report = validator.validate(&doc);

        let context = match self.env.resolve(self.options.backend) {
            Ok(context) => Some(context),
            Err(missing) => {
                report.extend(missing);
                None
            }
        };

        let Some(context) = context.filter(|_| report.is_ok()) else {
            info!(violations = report.violations.len(), "stack file rejected");
            return Err(PipelineError::Violations(report));
        };

        let labels_injected =
            LabelInjector::new(&self.policy, &context, report.main_services.clone())
                .inject(&mut doc)?;
        let logging_configured = LoggingInjector::new(&self.policy, &context).inject(&mut doc)?;

        info!(main_services = ?report.main_services, "stack file accepted");
        Ok(PipelineOutcome {
            document: doc,
            report,
            labels_injected,
            logging_configured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ViolationKind;

    const VALID: &str = r"
networks:
  proxy:
    external: true
services:
  web:
    networks: [proxy]
    deploy:
      labels: [traefik.enable=true]
  db:
    image: postgres
";

    fn doc(yaml: &str) -> DeploymentDocument {
        DeploymentDocument::from_value(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    fn env() -> CiEnvironment {
        CiEnvironment {
            project_url: Some("https://ci.fredhutch.org/FredHutch/shiny".into()),
            commit_author: Some("jdoe".into()),
            project_name: Some("shiny".into()),
            splunk_token: Some("tok".into()),
            splunk_url: Some("https://splunk:8088".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_process_valid_document() {
        let pipeline = Pipeline::new(PolicyConfig::default(), env(), PipelineOptions::default());
        let outcome = pipeline.process(doc(VALID)).unwrap();
        assert_eq!(outcome.labels_injected, 1);
        assert_eq!(outcome.logging_configured, 2);
        assert_eq!(outcome.report.main_services, vec!["web"]);
    }

    #[test]
    fn test_policy_and_environment_violations_reported_together() {
        let pipeline = Pipeline::new(
            PolicyConfig::default(),
            CiEnvironment::default(),
            PipelineOptions::default(),
        );
        let err = pipeline.process(doc("services: {}\n")).unwrap_err();
        let PipelineError::Violations(report) = err else {
            panic!("expected violations, got {err:?}");
        };
        assert!(report.has(ViolationKind::MissingNetworks));
        assert!(report.has(ViolationKind::NoMainService));
        assert!(report.has(ViolationKind::MissingEnvironment));
    }

    #[test]
    fn test_environment_alone_blocks_injection() {
        let mut partial = env();
        partial.splunk_url = None;
        let pipeline = Pipeline::new(PolicyConfig::default(), partial, PipelineOptions::default());
        let err = pipeline.process(doc(VALID)).unwrap_err();
        assert_eq!(err.to_string(), "Errors found:\nSPLUNK_URL not set");
    }

    #[test]
    fn test_rerun_on_own_output_is_stable() {
        let pipeline = Pipeline::new(PolicyConfig::default(), env(), PipelineOptions::default());
        let once = pipeline.process(doc(VALID)).unwrap().document;
        let twice = pipeline.process(once.clone()).unwrap().document;
        assert_eq!(once, twice);
    }
}
