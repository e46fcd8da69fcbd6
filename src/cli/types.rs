//! CLI type definitions
//!
//! This module contains the clap structure that defines the CLI interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::domain::models::environment::{CiEnvironment, LoggingBackend};
use crate::infrastructure::logging::{LogConfig, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "deploy-helper")]
#[command(
    about = "Validate a Docker Swarm stack file against deployment policy and inject metadata",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Stack file to process (`-` reads standard input)
    pub stack_file: PathBuf,

    /// Skip checks on the shared network declaration
    #[arg(long)]
    pub no_network_checks: bool,

    /// Ship logs with Fluentd instead of Splunk
    #[arg(long)]
    pub fluentd: bool,

    /// Validate only and print a summary instead of the stack file
    #[arg(long)]
    pub check: bool,

    /// Write the transformed stack file here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Policy override file (YAML)
    #[arg(short, long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Report errors and summaries as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact)]
    pub log_format: LogFormatArg,

    #[command(flatten)]
    pub ci: CiArgs,
}

/// CI-provided values; each falls back to its environment variable.
#[derive(clap::Args, Debug, Default)]
#[command(next_help_heading = "CI environment")]
pub struct CiArgs {
    /// Source repository URL
    #[arg(long, env = "CI_PROJECT_URL")]
    pub project_url: Option<String>,

    /// Owner identity of the deployed app
    #[arg(long, env = "CI_COMMIT_AUTHOR")]
    pub commit_author: Option<String>,

    /// Project (app) name
    #[arg(long, env = "CI_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Splunk HEC token
    #[arg(long, env = "SPLUNK_TOKEN", hide_env_values = true)]
    pub splunk_token: Option<String>,

    /// Splunk HEC endpoint
    #[arg(long, env = "SPLUNK_URL")]
    pub splunk_url: Option<String>,

    /// Fluentd forwarder host
    #[arg(long, env = "FLUENTD_HOST")]
    pub fluentd_host: Option<String>,

    /// Fluentd forwarder port
    #[arg(long, env = "FLUENTD_PORT")]
    pub fluentd_port: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Json,
    Pretty,
    Compact,
}

impl Cli {
    pub const fn backend(&self) -> LoggingBackend {
        if self.fluentd {
            LoggingBackend::Fluentd
        } else {
            LoggingBackend::Splunk
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: match self.log_format {
                LogFormatArg::Json => LogFormat::Json,
                LogFormatArg::Pretty => LogFormat::Pretty,
                LogFormatArg::Compact => LogFormat::Compact,
            },
        }
    }
}

impl From<CiArgs> for CiEnvironment {
    fn from(args: CiArgs) -> Self {
        Self {
            project_url: args.project_url,
            commit_author: args.commit_author,
            project_name: args.project_name,
            splunk_token: args.splunk_token,
            splunk_url: args.splunk_url,
            fluentd_host: args.fluentd_host,
            fluentd_port: args.fluentd_port,
        }
    }
}
