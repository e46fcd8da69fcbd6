//! CI-provided values the injector needs.
//!
//! Collected once at the CLI boundary; the rest of the crate never looks
//! at the process environment.

use serde::{Deserialize, Serialize};

use super::violation::{Violation, ViolationKind};

pub const CI_PROJECT_URL: &str = "CI_PROJECT_URL";
pub const CI_COMMIT_AUTHOR: &str = "CI_COMMIT_AUTHOR";
pub const CI_PROJECT_NAME: &str = "CI_PROJECT_NAME";
pub const SPLUNK_TOKEN: &str = "SPLUNK_TOKEN";
pub const SPLUNK_URL: &str = "SPLUNK_URL";
pub const FLUENTD_HOST: &str = "FLUENTD_HOST";
pub const FLUENTD_PORT: &str = "FLUENTD_PORT";

/// Log shipping backend written into every service's `logging` block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingBackend {
    #[default]
    Splunk,
    Fluentd,
}

impl LoggingBackend {
    pub const fn driver(self) -> &'static str {
        match self {
            Self::Splunk => "splunk",
            Self::Fluentd => "fluentd",
        }
    }
}

/// Raw values as found in the environment (or on the command line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
    pub project_url: Option<String>,
    pub commit_author: Option<String>,
    pub project_name: Option<String>,
    pub splunk_token: Option<String>,
    pub splunk_url: Option<String>,
    pub fluentd_host: Option<String>,
    pub fluentd_port: Option<String>,
}

/// Everything the injector needs, all present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionContext {
    pub project_url: String,
    pub owner: String,
    pub project_name: String,
    pub shipping: LogShipping,
}

/// Backend-specific connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogShipping {
    Splunk { token: String, url: String },
    Fluentd { host: String, port: u16 },
}

impl LogShipping {
    pub const fn backend(&self) -> LoggingBackend {
        match self {
            Self::Splunk { .. } => LoggingBackend::Splunk,
            Self::Fluentd { .. } => LoggingBackend::Fluentd,
        }
    }
}

impl CiEnvironment {
    /// Project name, if set and non-empty.
    pub fn project_name(&self) -> Option<&str> {
        present(self.project_name.as_ref())
    }

    /// Resolve the values required for `backend`, reporting every missing
    /// or malformed one rather than stopping at the first.
    ///
    /// Values belonging to the other backend are ignored.
    pub fn resolve(&self, backend: LoggingBackend) -> Result<InjectionContext, Vec<Violation>> {
        let mut violations = Vec::new();
        let mut require = |value: Option<&String>, name: &str| {
            let found = present(value);
            if found.is_none() {
                violations.push(Violation::new(
                    ViolationKind::MissingEnvironment,
                    format!("{name} not set"),
                ));
            }
            found.map(str::to_string)
        };

        let project_url = require(self.project_url.as_ref(), CI_PROJECT_URL);
        let owner = require(self.commit_author.as_ref(), CI_COMMIT_AUTHOR);
        let project_name = require(self.project_name.as_ref(), CI_PROJECT_NAME);

        let shipping = match backend {
            LoggingBackend::Splunk => {
                let token = require(self.splunk_token.as_ref(), SPLUNK_TOKEN);
                let url = require(self.splunk_url.as_ref(), SPLUNK_URL);
                token.zip(url).map(|(token, url)| LogShipping::Splunk { token, url })
            }
            LoggingBackend::Fluentd => {
                let host = require(self.fluentd_host.as_ref(), FLUENTD_HOST);
                let port = require(self.fluentd_port.as_ref(), FLUENTD_PORT).and_then(|raw| {
                    match raw.parse::<u16>() {
                        Ok(port) => Some(port),
                        Err(_) => {
                            violations.push(Violation::new(
                                ViolationKind::InvalidEnvironment,
                                format!("{FLUENTD_PORT} must be a port number, got '{raw}'"),
                            ));
                            None
                        }
                    }
                });
                host.zip(port).map(|(host, port)| LogShipping::Fluentd { host, port })
            }
        };

        match (project_url, owner, project_name, shipping) {
            (Some(project_url), Some(owner), Some(project_name), Some(shipping))
                if violations.is_empty() =>
            {
                Ok(InjectionContext {
                    project_url,
                    owner,
                    project_name,
                    shipping,
                })
            }
            _ => Err(violations),
        }
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}
