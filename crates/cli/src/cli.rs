use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Load every spreadsheet of the input directory into PostgreSQL
    Run {
        /// Directory holding the .xlsx files
        #[clap(short = 'i', long)]
        input_dir: Option<PathBuf>,
        /// Sheet to read from every workbook
        #[clap(short = 's', long)]
        sheet: Option<String>,
        /// Target table
        #[clap(short = 't', long)]
        table: Option<String>,
        /// Primary key column; enables incremental loading
        #[clap(short = 'k', long)]
        primary_key: Option<String>,
        /// Drop and recreate the target table
        #[clap(short = 'r', long)]
        replace: bool,
        /// Prepare the records but do not write them
        #[clap(long)]
        dry_run: bool,
        /// Lookup configuration file
        #[clap(short = 'c', long)]
        config: Option<PathBuf>,
    },

    /// Check that PostgreSQL answers
    Check {
        /// Lookup configuration file
        #[clap(short = 'c', long)]
        config: Option<PathBuf>,
    },
}

/// sheetload Command
#[derive(Parser)]
#[command(about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}
