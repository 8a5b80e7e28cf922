//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Diagnose the MCPO plugin: validate its configuration, then start, probe
/// and stop the gateway once.
#[derive(Debug, Parser)]
#[command(name = "mcpo-doctor")]
#[command(version)]
#[command(about = "Staged configuration and liveness diagnostic for the MCPO plugin")]
pub struct Cli {
    /// Plugin env file to load instead of ./config.env
    #[arg(long = "plugin-env", env = "MCPO_PLUGIN_ENV", value_name = "PATH")]
    pub plugin_env: Option<PathBuf>,

    /// Enable verbose/debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "mcpo-doctor",
            "--verbose",
            "--no-color",
            "--plugin-env",
            "/etc/mcpo/config.env",
        ]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.plugin_env, Some(PathBuf::from("/etc/mcpo/config.env")));
    }

    #[test]
    fn test_short_verbose() {
        let cli = Cli::parse_from(["mcpo-doctor", "-v"]);
        assert!(cli.verbose);
        assert!(!cli.no_color);
    }
}
