use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::PolicyConfig;
use crate::domain::models::labels::split_label;

/// Environment prefix for policy overrides, e.g. `DEPLOY_HELPER_NETWORK__NAME`.
pub const ENV_PREFIX: &str = "DEPLOY_HELPER_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Policy file not found: {0}")]
    PolicyFileNotFound(String),

    #[error("Shared network name cannot be empty")]
    EmptyNetworkName,

    #[error("Invalid routing label: '{0}'. Must have the form key=value")]
    InvalidRoutingLabel(String),

    #[error("Label prefix cannot be empty")]
    EmptyLabelPrefix,

    #[error("Log tag template for {0} cannot be empty")]
    EmptyTagTemplate(&'static str),
}

/// Policy loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the policy
    ///
    /// Precedence (lowest to highest):
    /// 1. Built-in defaults
    /// 2. The policy file given with `--policy`, if any
    /// 3. Environment variables (`DEPLOY_HELPER_*`, `__` separates nested keys)
    pub fn load(policy_file: Option<&Path>) -> Result<PolicyConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(PolicyConfig::default()));

        if let Some(path) = policy_file {
            if !path.is_file() {
                return Err(ConfigError::PolicyFileNotFound(path.display().to_string()).into());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let policy: PolicyConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract policy configuration")?;

        Self::validate(&policy)?;
        Ok(policy)
    }

    /// Validate policy after loading
    pub fn validate(policy: &PolicyConfig) -> Result<(), ConfigError> {
        if policy.network.name.trim().is_empty() {
            return Err(ConfigError::EmptyNetworkName);
        }

        let (key, value) = split_label(&policy.routing_label);
        if key.trim().is_empty() || value.is_empty() {
            return Err(ConfigError::InvalidRoutingLabel(policy.routing_label.clone()));
        }

        if policy.labels.prefix.trim().is_empty() {
            return Err(ConfigError::EmptyLabelPrefix);
        }

        if policy.logging.splunk_tag.is_empty() {
            return Err(ConfigError::EmptyTagTemplate("splunk"));
        }
        if policy.logging.fluentd_tag.is_empty() {
            return Err(ConfigError::EmptyTagTemplate("fluentd"));
        }

        Ok(())
    }
}
