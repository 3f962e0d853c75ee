//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "flora",
    version,
    about = "Extract botanical traits from floral treatments",
    long_about = "Extract structured plant traits (sizes, counts, colors, shapes) from \
                  floral treatment text.\n\n\
                  Writes JSON, CSV (one row per treatment) or an HTML report with \
                  the matched text highlighted."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract traits from treatment files or directories.
    Extract(ExtractArgs),

    /// Show the vocabulary size per term label.
    Terms(TermsArgs),
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// Treatment files (.html, .htm, .txt) or directories containing them.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormatArg,

    /// TOML file with extraction options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep only traits whose names match (wildcards `*` and `?`, repeatable).
    #[arg(long = "trait", value_name = "PATTERN")]
    pub traits: Vec<String>,

    /// Keep only treatments whose file name matches a genus (repeatable).
    #[arg(long = "genus", value_name = "GENUS")]
    pub genera: Vec<String>,

    /// Part name for traits not linked to any part.
    #[arg(long = "default-part", value_name = "PART")]
    pub default_part: Option<String>,

    /// Directory with terms.csv and units.csv replacing the built-in tables.
    #[arg(long = "terms-dir", value_name = "DIR")]
    pub terms_dir: Option<PathBuf>,

    /// Parse the whole text instead of the paragraph that reads most like
    /// a description.
    #[arg(long = "whole-text")]
    pub whole_text: bool,

    /// Do not render part mentions in bold in HTML output.
    #[arg(long = "no-highlight-parts")]
    pub no_highlight_parts: bool,
}

#[derive(Parser)]
pub struct TermsArgs {
    /// Directory with terms.csv and units.csv replacing the built-in tables.
    #[arg(long = "terms-dir", value_name = "DIR")]
    pub terms_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Csv,
    Html,
}

impl OutputFormatArg {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormatArg::Json => "json",
            OutputFormatArg::Csv => "csv",
            OutputFormatArg::Html => "html",
        }
    }
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
