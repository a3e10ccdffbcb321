//! PGD Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Builds the plant gene phenotype dataset from reshaped per-source tables.
//!
//! # Overview
//!
//! - **Loading**: reshaped CSV/TSV files with schema validation ([`reshaped`])
//! - **Identity resolution**: rows linked through shared identifiers become
//!   one gene ([`merge`])
//! - **Text**: sentence, word and stem variants of each description ([`text`])
//! - **Annotation**: ontology terms from a concept recognizer ([`annotate`])
//! - **Export**: CSV, TSV, JSON and truncated samples ([`export`])
//! - **Groupings**: pathway and phenotype-class memberships ([`groupings`])
//! - **Checks**: sanity checks on a finished dataset ([`check`])
//!
//! [`pipeline::CombinePipeline`] runs the whole build; the `pgd` binary wraps
//! it and the other steps as subcommands.

pub mod annotate;
pub mod check;
pub mod commands;
pub mod config;
pub mod export;
pub mod groupings;
pub mod merge;
pub mod pipeline;
pub mod progress;
pub mod reshaped;
pub mod text;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use merge::{merge_rows, MergeOptions, MergeOutcome};
pub use pipeline::{CombinePipeline, PipelineStats};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PGD - Plant Gene Dataset builder
#[derive(Parser, Debug)]
#[command(name = "pgd")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pipeline configuration file (TOML)
    #[arg(short, long, env = "PGD_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the combined dataset: merge, tokenize, annotate and export
    Combine {
        /// Directory holding the reshaped files
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Directory for the full output files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Directory for the sample files
        #[arg(long)]
        samples_dir: Option<PathBuf>,

        /// Match identifiers case sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// NOBLE Coder jar; enables concept recognition
        #[arg(long)]
        noble_coder: Option<PathBuf>,

        /// Keep genes that have no text
        #[arg(long)]
        keep_genes_without_text: bool,

        /// Reshaped files to combine, relative to the input directory
        /// (defaults to the configured list)
        files: Vec<String>,
    },

    /// Merge reshaped files and write one table with group ids
    Merge {
        /// Output file; `.tsv`/`.txt` are tab separated, anything else CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Match identifiers case sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Reshaped files to merge
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Build groupings.csv from the configured grouping sources
    Groupings,

    /// Check a finished dataset file for malformed descriptions
    Check {
        /// Dataset CSV or TSV
        file: PathBuf,
    },
}
