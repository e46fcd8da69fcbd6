use std::fmt;

use serde::Serialize;

/// Category of a policy or configuration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingNetworks,
    SharedNetwork,
    MissingServices,
    NoMainService,
    MalformedLabels,
    MissingRoutingLabel,
    ServiceNotOnSharedNetwork,
    ConflictingLabel,
    MissingEnvironment,
    InvalidEnvironment,
}

/// A single failed check, with enough context for a human to fix the
/// stack file or the pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            service: None,
            message: message.into(),
        }
    }

    pub fn for_service(kind: ViolationKind, service: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            service: Some(service.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.service {
            Some(service) => write!(f, "service '{}': {}", service, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of a validation pass: the main services that were found and
/// every violation discovered along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub main_services: Vec<String>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

impl Extend<Violation> for ValidationReport {
    fn extend<T: IntoIterator<Item = Violation>>(&mut self, iter: T) {
        self.violations.extend(iter);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "{}", lines.join("\n"))
    }
}
