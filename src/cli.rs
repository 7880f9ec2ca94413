//! CLI argument parsing for the candidate-import binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "candidate-import", about = "Bulk candidate import from CSV or Excel files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import candidates from a .csv, .xls or .xlsx file
    Import {
        /// File to import
        file: PathBuf,
        /// Declared content type, e.g. text/csv
        #[arg(long)]
        content_type: Option<String>,
        /// Write accepted candidates here as JSON (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write the CSV import template
    Template {
        /// Destination file (defaults to candidates_template.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
