//! CLI argument definitions for csvcheck.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "csvcheck",
    version,
    about = "Tokenize CSV files and validate them against a column schema",
    long_about = "Tokenize CSV files and validate them against a column schema.\n\n\
                  Headers are matched case- and whitespace-insensitively. Rows that\n\
                  fail the schema are reported individually; header problems stop\n\
                  the run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the module path of each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Allow CSV field values to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the tokenized rows of a CSV file.
    Rows(RowsArgs),

    /// Check the header and validate every data row.
    Validate(ValidateArgs),
}

#[derive(Parser)]
pub struct RowsArgs {
    /// CSV file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// CSV file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON schema describing each column.
    ///
    /// Without a schema only the header is checked and every row passes.
    #[arg(long = "schema", value_name = "SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Additional column that must appear exactly once (repeatable).
    #[arg(long = "require", value_name = "COLUMN")]
    pub require: Vec<String>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
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
