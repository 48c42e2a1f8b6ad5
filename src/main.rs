use circleopt::cli::Cli;
use circleopt::commands::{handle_analyze, list_analyzers, AnalyzeConfig};
use circleopt::errors::LoadError;
use circleopt::formatting::FormattingConfig;
use circleopt::observability::init_logging;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_analyzers {
        println!("{}", list_analyzers());
        return ExitCode::SUCCESS;
    }

    let formatting_config = if cli.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    };

    let config = AnalyzeConfig {
        config_path: cli.config,
        format: cli.format,
        output: cli.output,
        min_priority: cli.min_priority,
        settings: cli.settings,
        parallel: cli.parallel,
        formatting_config,
    };

    match handle_analyze(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<LoadError>() {
                Some(load_error) => {
                    eprintln!("Error: {load_error}");
                    eprintln!("Hint: {}", load_error.hint());
                }
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
