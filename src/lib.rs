//! # iso-typer
//!
//! A library for typing and profiling bacterial isolates from assembled
//! genomes.
//!
//! Given one genome, iso-typer builds a search index once and then runs a
//! configurable set of reference-database analyses against it concurrently:
//! multi-locus sequence typing, antimicrobial resistance summarization, an
//! external pathogen risk classification, and plain single-search analyses.
//! All outcomes merge into one report; a failing analysis is recorded and
//! never aborts its siblings.
//!
//! ## Features
//!
//! - **Handler-chain dispatch**: analyses route to workflows through a flat
//!   ordered handler list with a terminal fallback, so new analysis kinds
//!   slot in without touching the dispatch loop
//! - **Concurrent execution**: one task per catalog entry against a shared
//!   read-only index, joined under a single coordinator
//! - **Graceful degradation**: a failed locus search degrades typing to an
//!   incomplete profile instead of failing the workflow
//! - **Strict external contracts**: tool exit codes, expected artifacts,
//!   and the tabular output columns are all validated
//!
//! ## Example
//!
//! ```rust,no_run
//! use iso_typer::{AnalysisCatalog, Pipeline, PipelineSettings};
//! use std::path::Path;
//!
//! let catalog = AnalysisCatalog::load_embedded().unwrap();
//! let pipeline = Pipeline::new(catalog, PipelineSettings::default());
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let report = rt
//!     .block_on(pipeline.run(Path::new("sample.fasta")))
//!     .unwrap();
//!
//! for record in &report.analyses {
//!     println!("{}: {}", record.analysis, record.status.is_success());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Analysis catalog and typing scheme configuration
//! - [`core`]: Core data types for genomes, hits, and outcomes
//! - [`parsing`]: FASTA and profile table input
//! - [`search`]: Index construction and sequence search
//! - [`pipeline`]: Dispatch, concurrency, and aggregation
//! - [`workflows`]: The workflow handlers behind the dispatch chain
//! - [`report`]: Final report rendering
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod parsing;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod utils;
pub mod workflows;

// Re-export commonly used types for convenience
pub use crate::catalog::scheme::TypingScheme;
pub use crate::catalog::store::{AnalysisCatalog, CatalogEntry};
pub use crate::core::genome::{detect_species, Genome};
pub use crate::core::hit::SequenceHit;
pub use crate::core::outcome::{AnalysisOutcome, AnalysisStatus, PipelineReport};
pub use crate::core::types::{HitThresholds, SpeciesTag};
pub use crate::pipeline::context::{AnalysisContext, PipelineSettings};
pub use crate::pipeline::dispatch::{AnalysisHandler, AnalysisTask, HandlerChain};
pub use crate::pipeline::Pipeline;
