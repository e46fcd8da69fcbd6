use serde_yaml::Value;
use tracing::debug;

use crate::domain::models::document::{deploy_labels, joins_network};
use crate::domain::models::{
    DeploymentDocument, Labels, MainServiceMode, PolicyConfig, ValidationReport, Violation,
    ViolationKind,
};

/// Per-run switches for the validator.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Skip every network-related check
    pub skip_network_checks: bool,
    /// Project being deployed, used to spot labels left by another app
    pub project_name: Option<String>,
}

/// Runs the policy checks against a stack file.
///
/// Every check runs in a single pass and all violations are collected.
/// A check whose precondition failed is not attempted (there is no shared
/// network check without `networks`, no label checks without a main
/// service).
#[derive(Debug, Clone)]
pub struct PolicyValidator<'a> {
    policy: &'a PolicyConfig,
    options: ValidateOptions,
}

impl<'a> PolicyValidator<'a> {
    pub const fn new(policy: &'a PolicyConfig, options: ValidateOptions) -> Self {
        Self { policy, options }
    }

    pub fn validate(&self, doc: &DeploymentDocument) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.options.skip_network_checks {
            debug!("network checks disabled");
        } else {
            self.check_networks(doc, &mut report);
        }

        let Some(services) = doc.services() else {
            report.push(Violation::new(ViolationKind::MissingServices, "No services defined"));
            return report;
        };

        let main_services = self.main_services(services.iter());
        if main_services.is_empty() {
            report.push(Violation::new(
                ViolationKind::NoMainService,
                "No service found with deploy.labels",
            ));
            return report;
        }

        for (name, service, labels) in main_services {
            debug!(service = name, labels = labels.len(), "checking main service");
            self.check_main_service(name, service, labels, &mut report);
            report.main_services.push(name.to_string());
        }

        report
    }

    fn check_networks(&self, doc: &DeploymentDocument, report: &mut ValidationReport) {
        let shared = &self.policy.network;
        let Some(networks) = doc.networks() else {
            report.push(Violation::new(ViolationKind::MissingNetworks, "No networks defined"));
            return;
        };

        let declared = networks
            .as_mapping()
            .and_then(|networks| networks.get(shared.name.as_str()));
        let ok = declared.is_some_and(|decl| shared.shape.matches(decl));
        if !ok {
            report.push(Violation::new(
                ViolationKind::SharedNetwork,
                format!(
                    "Must have '{}' network defined as {}",
                    shared.name,
                    shared.shape.describe()
                ),
            ));
        }
    }

    fn main_services<'d>(
        &self,
        services: impl Iterator<Item = (&'d Value, &'d Value)>,
    ) -> Vec<(&'d str, &'d Value, Labels<'d>)> {
        let mut found = Vec::new();
        for (key, service) in services {
            let Some(name) = key.as_str() else {
                continue;
            };
            if let Some(labels) = deploy_labels(service) {
                found.push((name, service, labels));
                if self.policy.main_services == MainServiceMode::First {
                    break;
                }
            }
        }
        found
    }

    fn check_main_service(
        &self,
        name: &str,
        service: &Value,
        labels: Labels<'_>,
        report: &mut ValidationReport,
    ) {
        if matches!(labels, Labels::Empty) {
            report.push(Violation::for_service(
                ViolationKind::MalformedLabels,
                name,
                "deploy.labels must be a list or a mapping",
            ));
        }

        if !labels.contains(&self.policy.routing_label) {
            report.push(Violation::for_service(
                ViolationKind::MissingRoutingLabel,
                name,
                format!("{} label not set", self.policy.routing_label),
            ));
        }

        if self.policy.require_service_network
            && !self.options.skip_network_checks
            && !joins_network(service, &self.policy.network.name)
        {
            report.push(Violation::for_service(
                ViolationKind::ServiceNotOnSharedNetwork,
                name,
                format!("must be attached to the '{}' network", self.policy.network.name),
            ));
        }

        if let Some(project) = self.options.project_name.as_deref() {
            let key = self.policy.labels.name_key();
            if let Some(existing) = labels.value_of(&key) {
                if existing != project {
                    report.push(Violation::for_service(
                        ViolationKind::ConflictingLabel,
                        name,
                        format!("{key} is already set to '{existing}', not '{project}'"),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NetworkShape;

    const VALID: &str = r"
networks:
  proxy:
    external: true
services:
  web:
    image: nginx
    networks: [proxy]
    deploy:
      labels:
        - traefik.enable=true
  db:
    image: postgres
";

    fn doc(yaml: &str) -> DeploymentDocument {
        DeploymentDocument::from_value(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    fn validate(yaml: &str) -> ValidationReport {
        let policy = PolicyConfig::default();
        PolicyValidator::new(&policy, ValidateOptions::default()).validate(&doc(yaml))
    }

    fn kinds(report: &ValidationReport) -> Vec<ViolationKind> {
        report.violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_valid_document() {
        let report = validate(VALID);
        assert!(report.is_ok(), "{report}");
        assert_eq!(report.main_services, vec!["web"]);
    }

    #[test]
    fn test_main_service_from_merge_key() {
        let parsed = crate::infrastructure::document::parse_document(
            r"
x-routed: &routed
  networks: [proxy]
  deploy:
    labels: [traefik.enable=true]
networks:
  proxy:
    external: true
services:
  web:
    <<: *routed
    image: nginx
",
        )
        .unwrap();
        let policy = PolicyConfig::default();
        let report = PolicyValidator::new(&policy, ValidateOptions::default()).validate(&parsed);
        assert!(report.is_ok(), "{report}");
        assert_eq!(report.main_services, vec!["web"]);
    }

    #[test]
    fn test_missing_networks_skips_shared_network_check() {
        let report = validate(
            r"
services:
  web:
    networks: [proxy]
    deploy:
      labels: [traefik.enable=true]
",
        );
        assert_eq!(kinds(&report), vec![ViolationKind::MissingNetworks]);
    }

    #[test]
    fn test_shared_network_must_be_external() {
        let report = validate(&VALID.replace("external: true", "external: false"));
        assert_eq!(kinds(&report), vec![ViolationKind::SharedNetwork]);
        assert_eq!(
            report.violations[0].message,
            "Must have 'proxy' network defined as external: true"
        );
    }

    #[test]
    fn test_bare_shape_policy() {
        let mut policy = PolicyConfig::default();
        policy.network.shape = NetworkShape::Bare;
        let d = doc(&VALID.replace("  proxy:\n    external: true\n", "  proxy:\n"));
        let report = PolicyValidator::new(&policy, ValidateOptions::default()).validate(&d);
        assert!(report.is_ok(), "{report}");
    }

    #[test]
    fn test_no_main_service() {
        let report = validate(
            r"
networks:
  proxy:
    external: true
services:
  web:
    image: nginx
",
        );
        assert_eq!(kinds(&report), vec![ViolationKind::NoMainService]);
    }

    #[test]
    fn test_missing_services() {
        let report = validate("networks:\n  proxy:\n    external: true\n");
        assert_eq!(kinds(&report), vec![ViolationKind::MissingServices]);
    }

    #[test]
    fn test_top_level_and_service_violations_are_collected_together() {
        let report = validate(
            r"
services:
  web:
    deploy:
      labels: [foo=bar]
",
        );
        assert_eq!(
            kinds(&report),
            vec![
                ViolationKind::MissingNetworks,
                ViolationKind::MissingRoutingLabel,
                ViolationKind::ServiceNotOnSharedNetwork,
            ]
        );
        assert_eq!(report.violations[1].service.as_deref(), Some("web"));
    }

    #[test]
    fn test_all_mode_checks_every_main_service() {
        let report = validate(
            r"
networks:
  proxy:
    external: true
services:
  web:
    networks: [proxy]
    deploy:
      labels: [traefik.enable=true]
  api:
    networks: [proxy]
    deploy:
      labels: [traefik.enable=false]
",
        );
        assert_eq!(report.main_services, vec!["web", "api"]);
        assert_eq!(kinds(&report), vec![ViolationKind::MissingRoutingLabel]);
        assert_eq!(report.violations[0].service.as_deref(), Some("api"));
    }

    #[test]
    fn test_first_mode_stops_at_first_main_service() {
        let mut policy = PolicyConfig::default();
        policy.main_services = MainServiceMode::First;
        let d = doc(
            r"
networks:
  proxy:
    external: true
services:
  web:
    networks: [proxy]
    deploy:
      labels: [traefik.enable=true]
  api:
    deploy:
      labels: []
",
        );
        let report = PolicyValidator::new(&policy, ValidateOptions::default()).validate(&d);
        assert!(report.is_ok(), "{report}");
        assert_eq!(report.main_services, vec!["web"]);
    }

    #[test]
    fn test_skip_network_checks() {
        let policy = PolicyConfig::default();
        let options = ValidateOptions {
            skip_network_checks: true,
            ..Default::default()
        };
        let d = doc("services:\n  web:\n    deploy:\n      labels: [traefik.enable=true]\n");
        let report = PolicyValidator::new(&policy, options).validate(&d);
        assert!(report.is_ok(), "{report}");
    }

    #[test]
    fn test_empty_labels_are_reported() {
        let report = validate(
            r"
networks:
  proxy:
    external: true
services:
  web:
    networks: [proxy]
    deploy:
      labels:
",
        );
        assert_eq!(
            kinds(&report),
            vec![ViolationKind::MalformedLabels, ViolationKind::MissingRoutingLabel]
        );
    }

    #[test]
    fn test_conflicting_app_name() {
        let policy = PolicyConfig::default();
        let options = ValidateOptions {
            project_name: Some("shiny".into()),
            ..Default::default()
        };
        let other = VALID.replace(
            "- traefik.enable=true",
            "- traefik.enable=true\n        - org.fredhutch.app.name=other-app",
        );
        let report = PolicyValidator::new(&policy, options.clone()).validate(&doc(&other));
        assert_eq!(kinds(&report), vec![ViolationKind::ConflictingLabel]);

        let same = other.replace("other-app", "shiny");
        let report = PolicyValidator::new(&policy, options).validate(&doc(&same));
        assert!(report.is_ok(), "{report}");
    }
}
