//! Command-line interface for iso-typer.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run**: Execute every configured analysis against one genome
//! - **catalog**: List the analyses a catalog configures
//!
//! ## Usage
//!
//! ```text
//! # Profile a genome with the built-in analysis catalog
//! iso-typer run sample.fasta
//!
//! # Custom database root and output location
//! iso-typer run sample.fasta --database-root /data/db -o results/
//!
//! # JSON output for scripting
//! iso-typer run sample.fasta --format json
//!
//! # Show what would run
//! iso-typer catalog
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod run;

#[derive(Parser)]
#[command(name = "iso-typer")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Type and profile bacterial isolates from assembled genomes")]
#[command(
    long_about = "iso-typer runs a set of reference-database analyses against one assembled genome:\nmulti-locus sequence typing, antimicrobial resistance summarization, pathogen risk\nclassification, and plain reference searches.\n\nAnalyses run concurrently against a shared search index; a failing analysis is reported\nand never takes its siblings down."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every configured analysis against a genome
    Run(run::RunArgs),

    /// List configured analyses
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
