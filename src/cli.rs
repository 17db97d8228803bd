use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apiflows")]
#[command(version)]
#[command(about = "Validate API workflow documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List workflows and steps in a workflows document
    List {
        /// Path to the workflows document (.yaml, .yml or .json)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Validate a workflows document and report every violation
    Validate {
        /// Path to the workflows document (.yaml, .yml or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Report format
        #[arg(short = 'F', long, default_value = "text")]
        format: ReportFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Colored human-readable report
    Text,
    /// JSON report
    Json,
}
