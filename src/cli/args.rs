//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, property::PropertyArgs, resolve::ResolveCommands,
    search::SearchArgs, stats::StatsCommands, status::StatusArgs, tx::TxArgs,
};

#[derive(Parser)]
#[command(name = "dxb")]
#[command(author, version, about = "Dubai Land Department transaction toolkit")]
#[command(long_about = "Query, aggregate and trace the resale history of Dubai property transactions from a local read-only SQLite store.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Path to the transaction store (overrides DLD_DATABASE_PATH and config)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Use generated sample data instead of the store
    #[arg(long, global = true, conflicts_with = "no_fallback")]
    pub sample: bool,

    /// Fail instead of serving sample data when the store is unavailable
    #[arg(long, global = true)]
    pub no_fallback: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List transactions matching filters
    Tx(TxArgs),

    /// Show the sale history of one unit
    Property(PropertyArgs),

    /// Area, building and market rollups
    #[command(subcommand)]
    Stats(StatsCommands),

    /// Find areas and buildings by name
    Search(SearchArgs),

    /// Resolve area aliases and developers
    #[command(subcommand)]
    Resolve(ResolveCommands),

    /// Show data source status
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal, TSV when piped
    #[default]
    Auto,
    /// Boxed table
    Table,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Resolve `Auto` against whether stdout is a terminal
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if console::Term::stdout().is_term() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Tsv,
            f => f,
        }
    }

    /// Formats that serialize the whole response
    pub fn is_structured(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }

    /// Parse a configured `default_format` value
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

impl GlobalOpts {
    /// Explicit `--format`, else the configured default, resolved for stdout
    pub fn output_format(&self, configured: Option<&str>) -> OutputFormat {
        let format = match self.format {
            OutputFormat::Auto => configured
                .and_then(OutputFormat::from_config)
                .unwrap_or(OutputFormat::Auto),
            f => f,
        };
        format.resolve()
    }

    /// Log level implied by `-q`/`-v`
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
