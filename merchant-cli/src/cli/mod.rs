//! Command-line interface for the merchant update portal

pub mod commands;
pub mod output;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::sheet::TEMPLATE_FILE_NAME;

/// Update merchant contact records one at a time or from a spreadsheet
#[derive(Parser, Debug)]
#[command(name = "merchant-cli", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update a single merchant (missing values are prompted for)
    Update(UpdateArgs),

    /// Preview a spreadsheet and upload it for bulk update
    Upload {
        /// Spreadsheet to upload (.xlsx, .xls, .xlsb, .ods)
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Number of rows to preview before uploading
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Show the normalized rows of a spreadsheet without uploading
    Preview {
        /// Spreadsheet to read
        file: PathBuf,

        /// Number of rows to show
        #[arg(long)]
        rows: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Write the bulk upload template workbook
    Template {
        /// Where to save the template
        #[arg(short, long, default_value = TEMPLATE_FILE_NAME)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    #[arg(long)]
    pub merchant_id: Option<String>,

    /// Contact person name
    #[arg(long)]
    pub name: Option<String>,

    /// Contact person email
    #[arg(long)]
    pub email: Option<String>,

    /// Contact person phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Contact person relation to the merchant (e.g. CEO)
    #[arg(long)]
    pub relation: Option<String>,

    /// Incorporation date (YYYY-MM-DD preferred)
    #[arg(long)]
    pub incorporation_date: Option<String>,
}

/// Preview output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// Pretty-printed JSON
    Json,
    /// CSV with canonical headers
    Csv,
}
