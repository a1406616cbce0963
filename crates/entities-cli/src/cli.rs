//! CLI argument definitions for the entity compiler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "compile-entities",
    version,
    about = "Compile specialist and software records into one sorted JSON document",
    long_about = "Compile specialist and software records into one sorted JSON document.\n\n\
                  Records are read from an entity tree or combined YAML/JSON documents,\n\
                  validated against the vocabulary, and enriched for display. Missing\n\
                  thumbnails are rendered in the background."
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
    /// Compile records into the output document.
    Compile(CompileArgs),

    /// List the controlled vocabularies.
    Vocabulary(VocabularyArgs),
}

#[derive(Parser)]
pub struct CompileArgs {
    /// Entity tree root containing one directory per kind.
    #[arg(long = "entities-dir", value_name = "DIR")]
    pub entities_dir: Option<PathBuf>,

    /// Combined document holding a sequence of records (repeatable).
    ///
    /// The kind comes from the file name, e.g. `specialists.yaml`.
    #[arg(long = "combined", value_name = "FILE")]
    pub combined: Vec<PathBuf>,

    /// Vocabulary document (default: <ENTITIES_DIR>/valid_values.json).
    #[arg(long = "vocabulary", value_name = "FILE")]
    pub vocabulary: Option<PathBuf>,

    /// Output file (default: entities.json).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory that `/resources/` URLs resolve against (overrides
    /// `ENTITIES_RESOURCE_DIR`).
    #[arg(long = "resource-dir", value_name = "DIR")]
    pub resource_dir: Option<PathBuf>,

    /// Do not render missing thumbnails.
    #[arg(long = "no-thumbnails")]
    pub no_thumbnails: bool,

    /// Number of thumbnail worker threads.
    #[arg(long = "thumbnail-workers", value_name = "N")]
    pub thumbnail_workers: Option<usize>,

    /// Pretty-print the output document.
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Validate and report without writing output or thumbnails.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct VocabularyArgs {
    /// Vocabulary document (default: <ENTITIES_DIR>/valid_values.json).
    #[arg(long = "vocabulary", value_name = "FILE")]
    pub vocabulary: Option<PathBuf>,

    /// Entity tree root holding `valid_values.json`.
    #[arg(long = "entities-dir", value_name = "DIR")]
    pub entities_dir: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
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
