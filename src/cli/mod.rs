//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::Cli;

use console::style;

use crate::services::PipelineError;

/// Exit status for any failed run. Usage errors exit with clap's 2.
pub const EXIT_FAILURE: i32 = 1;

/// Report a failed run on stderr and exit.
///
/// Policy and environment violations are listed one per line so every
/// problem can be fixed in a single round trip.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let violations = match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Violations(report)) => Some(report),
        _ => None,
    };

    if json_mode {
        let body = serde_json::json!({
            "error": violations.map_or_else(|| format!("{err:#}"), |_| "Errors found".to_string()),
            "violations": violations.map(|report| &report.violations),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else if let Some(report) = violations {
        eprintln!("{} Errors found:", style("error:").for_stderr().red().bold());
        for violation in &report.violations {
            eprintln!("  {} {violation}", style("-").for_stderr().dim());
        }
    } else {
        eprintln!("{} {err:#}", style("error:").for_stderr().red().bold());
    }

    std::process::exit(EXIT_FAILURE);
}
