//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "statusprobe")]
#[command(version, about = "Probe production services and publish their status", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every component once and publish the results
    Run(RunArgs),

    /// Show registered components and their probes
    List {
        /// Configuration file (built-in registry when omitted)
        #[arg(short, long, env = "STATUSPROBE_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Configuration file (built-in registry when omitted)
    #[arg(short, long, env = "STATUSPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Probe without publishing to the status board
    #[arg(long)]
    pub dry_run: bool,

    /// Probe components concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Status board API key, overrides the variable named by `api_key_env`
    #[arg(long, env = "STATUSPAGE_APIKEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::try_parse_from([
            "statusprobe",
            "run",
            "--config",
            "probe.toml",
            "--dry-run",
            "--parallel",
            "--json",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.config, Some(PathBuf::from("probe.toml")));
        assert!(args.dry_run);
        assert!(args.parallel);
        assert!(args.json);
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["statusprobe", "list", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
