use crate::core::Priority;
use crate::output::OutputFormat;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = ".circleci/config.yml";

#[derive(Parser, Debug)]
#[command(name = "circleopt")]
#[command(
    about = "Static optimization analyzer for CircleCI pipeline configuration",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// CircleCI config to analyze
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Output format (overrides the settings file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only list findings at or above this priority (high, medium, low)
    #[arg(long)]
    pub min_priority: Option<Priority>,

    /// Settings file to use instead of discovering .circleopt.toml
    #[arg(long, env = "CIRCLEOPT_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Run analyzers in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Plain output without colors
    #[arg(long)]
    pub plain: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the analyzer names and exit
    #[arg(long)]
    pub list_analyzers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["circleopt"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.format, None);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.parallel);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "circleopt",
            "ci.yml",
            "-f",
            "json",
            "--min-priority",
            "medium",
            "-vv",
            "--parallel",
        ]);
        assert_eq!(cli.config, PathBuf::from("ci.yml"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.min_priority, Some(Priority::Medium));
        assert_eq!(cli.verbose, 2);
        assert!(cli.parallel);
    }

    #[test]
    fn test_rejects_unknown_priority() {
        assert!(Cli::try_parse_from(["circleopt", "--min-priority", "urgent"]).is_err());
    }
}
