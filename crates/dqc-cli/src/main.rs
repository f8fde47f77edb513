//! DICOM QC CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use dqc_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use dqc_cli::commands::{run_check, run_session};
use dqc_cli::logging::{LogConfig, LogFormat, init_logging};
use dqc_model::DqcError;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(2);
    }
    let exit_code = match cli.command {
        Command::Check(args) => match run_check(&args) {
            Ok(report) => {
                if report.is_compliant() {
                    0
                } else {
                    1
                }
            }
            Err(error) => report_error(&error),
        },
        Command::Session(args) => match run_session(&args) {
            Ok(outcome) => {
                if outcome.compliant {
                    0
                } else {
                    1
                }
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

/// Schema errors get their own exit code; anything else folds into the
/// generic failure code.
fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    if is_schema_error(error) { 2 } else { 1 }
}

fn is_schema_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<DqcError>(), Some(DqcError::Schema { .. })))
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
