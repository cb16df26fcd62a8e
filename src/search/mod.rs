//! Index construction and sequence search against the input genome.
//!
//! This module owns every interaction with the external search tools:
//!
//! - [`SearchIndexBuilder`]: one-time `makeblastdb` run, fatal on failure
//! - [`SequenceSearchEngine`]: per-workflow `blastn` searches, concurrent
//!   against the shared read-only [`SearchIndex`]
//! - [`tabular`]: the fixed twelve-column output contract
//!
//! Execution failures and malformed output are separate error variants so
//! callers can distinguish a crashed tool from a garbled one.

pub mod engine;
pub mod index;
pub mod tabular;

use std::path::PathBuf;

use thiserror::Error;

use crate::parsing::fasta::FastaError;
use crate::search::tabular::TabularParseError;
use crate::utils::process::CommandError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("index artifact missing after build: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error(transparent)]
    Parse(#[from] TabularParseError),

    #[error(transparent)]
    Fasta(#[from] FastaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub use engine::SequenceSearchEngine;
pub use index::{SearchIndex, SearchIndexBuilder};
