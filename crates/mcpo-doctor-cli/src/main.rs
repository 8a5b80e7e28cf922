//! CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcpo_doctor_cli::{Cli, CliConfig, ConsoleReporter, bootstrap};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    init_logging(config.verbose);

    let mut reporter = ConsoleReporter::stdout(config.color);
    let context = match bootstrap(&config) {
        Ok(context) => context,
        Err(err) => {
            reporter.config_failed(&err);
            return ExitCode::from(err.exit_code());
        }
    };
    reporter.config_loaded(&context.config);

    let report = context.service.run(&mut reporter).await;
    reporter.finish(&report);
    ExitCode::from(report.exit_code())
}

/// Logs go to stderr so stdout carries only the verdict stream.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
