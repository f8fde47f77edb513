//! CLI argument definitions for the DICOM QC tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dicom-qc",
    version,
    about = "DICOM QC - Validate session metadata against reference schemas",
    long_about = "Validate DICOM session metadata against declarative reference schemas.\n\n\
                  Checks single acquisitions or whole sessions, matching observed\n\
                  acquisitions to reference definitions before evaluation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check one acquisition record against a reference schema.
    Check(CheckArgs),

    /// Match and check a whole session against a reference schema.
    Session(SessionArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the reference schema document (JSON).
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Scan identifier inside the schema document.
    #[arg(long, value_name = "NAME")]
    pub scan: String,

    /// Named constraint group within the scan.
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Path to the acquisition record (JSON object).
    #[arg(long, value_name = "PATH")]
    pub record: PathBuf,

    /// Write the compliance report as JSON.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SessionArgs {
    /// Path to the reference schema document (JSON).
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Path to the session data (JSON array of records, or CSV).
    #[arg(long, value_name = "PATH")]
    pub session: PathBuf,

    /// Write the session report as JSON.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Prompt on stdin for ambiguous acquisition matches.
    #[arg(long)]
    pub interactive: bool,

    /// Write the nested report shape instead of the flat one.
    #[arg(long)]
    pub nested: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
