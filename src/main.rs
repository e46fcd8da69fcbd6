//! deploy-helper CLI entry point.

use clap::Parser;

use deploy_helper::cli::Cli;
use deploy_helper::infrastructure::logging::LoggerImpl;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = LoggerImpl::init(&cli.log_config()) {
        deploy_helper::cli::handle_error(err, json);
    }

    if let Err(err) = deploy_helper::cli::commands::run::execute(cli) {
        deploy_helper::cli::handle_error(err, json);
    }
}
