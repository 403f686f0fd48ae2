use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tierz::export::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "tierz", bin_name = "tierz", version)]
#[command(about = "Arrange a fixed catalog of items into ranked tiers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the arrangement and config.json
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every tier and its items
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Move an item to a tier, at a position or at the end
    #[command(alias = "mv", display_order = 2)]
    Move {
        /// Item id or name
        item: String,

        /// Target tier
        tier: String,

        /// One-based position; omitted appends to the tier
        position: Option<usize>,
    },

    /// Drop an item onto another item or onto a tier row
    #[command(display_order = 3)]
    Drop {
        /// Item id or name
        item: String,

        #[command(flatten)]
        target: DropArgs,
    },

    /// List the positions an item can take in a tier
    #[command(display_order = 4)]
    Options {
        /// Item id or name
        item: String,

        /// Target tier
        tier: String,
    },

    /// Export the tier list as text, or all formats as a tar.gz bundle
    #[command(display_order = 10)]
    Export {
        /// Output format (defaults to the configured export_format)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE", conflicts_with = "bundle")]
        output: Option<PathBuf>,

        /// Write a tar.gz bundle with every format into this directory
        #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
        bundle: Option<PathBuf>,
    },

    /// Write the default arrangement to the store
    #[command(alias = "init", display_order = 11)]
    Seed {
        /// Overwrite an existing arrangement
        #[arg(long)]
        force: bool,
    },

    /// Check and fix stored data
    #[command(display_order = 20)]
    Doctor,

    /// Get or set configuration
    #[command(display_order = 21)]
    Config {
        /// Configuration key (catalog_path, export_format)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct DropArgs {
    /// Item to drop onto; takes its place
    #[arg(long, value_name = "ITEM")]
    pub on: Option<String>,

    /// Tier row to drop onto; appends
    #[arg(long, value_name = "TIER")]
    pub tier: Option<String>,

    /// Release outside any target
    #[arg(long)]
    pub outside: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    #[value(alias = "md")]
    Markdown,
    #[value(alias = "txt")]
    Text,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Text => ExportFormat::Text,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}
