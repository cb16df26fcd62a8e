//! Pipeline orchestration: from genome file to final report.
//!
//! The run proceeds in two phases. The startup phase is fail-fast: tool
//! probe, genome load, and the one-time index build each abort the whole
//! run on failure, and no workflow ever starts. Once dispatch hands tasks
//! to the coordinator, nothing propagates past it: every per-analysis
//! failure is folded into the outcome set, and a report is always produced.

pub mod aggregate;
pub mod context;
pub mod coordinator;
pub mod dispatch;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::scheme::TypingScheme;
use crate::catalog::store::{AnalysisCatalog, CatalogError};
use crate::core::outcome::PipelineReport;
use crate::parsing::fasta::{load_genome, FastaError};
use crate::pipeline::context::{AnalysisContext, PipelineSettings};
use crate::pipeline::dispatch::AnalysisTask;
use crate::report;
use crate::search::engine::SequenceSearchEngine;
use crate::search::index::SearchIndexBuilder;
use crate::search::SearchError;
use crate::utils::deps::find_missing;
use crate::workflows::{self, sequence_type};

/// Tools every run needs before anything else happens
const REQUIRED_TOOLS: &[&str] = &["blastn", "makeblastdb"];

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("required tool not found on PATH: {0}")]
    MissingDependency(String),

    #[error("failed to read genome: {0}")]
    Genome(#[from] FastaError),

    #[error("search index build failed: {0}")]
    IndexBuild(#[from] SearchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One configured pipeline, reusable across genomes.
pub struct Pipeline {
    catalog: AnalysisCatalog,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(catalog: AnalysisCatalog, settings: PipelineSettings) -> Self {
        Self { catalog, settings }
    }

    /// Run every configured analysis against one genome.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] only for fatal startup conditions
    /// (missing tool, unreadable genome, index build failure). Per-analysis
    /// failures never surface here; they are recorded in the report.
    pub async fn run(&self, genome_path: &Path) -> Result<PipelineReport, PipelineError> {
        // Fail fast before any analysis executes
        if let Some(tool) = find_missing(REQUIRED_TOOLS).into_iter().next() {
            return Err(PipelineError::MissingDependency(tool));
        }

        let genome = load_genome(genome_path)?;
        info!(
            genome = %genome.id,
            species = %genome.species,
            contigs = genome.contig_count,
            bases = genome.total_bases,
            "genome loaded"
        );

        let results_dir = self
            .settings
            .results_root
            .join(&genome.id)
            .join(genome.species.as_str());
        std::fs::create_dir_all(&results_dir)?;

        // Scratch space lives for the duration of the run only
        let scratch = tempfile::Builder::new().prefix("iso-typer-").tempdir()?;

        // One-time, synchronous with respect to the workflows: everything
        // below blocks on the index existing
        let index = SearchIndexBuilder::new(self.settings.search_timeout)
            .build(&genome, &scratch.path().join("index"))
            .await?;

        let scheme = self.discover_scheme(&genome);

        let context = Arc::new(AnalysisContext {
            engine: SequenceSearchEngine::new(self.settings.search_timeout, self.settings.threads),
            genome: genome.clone(),
            index,
            results_dir: results_dir.clone(),
            work_dir: scratch.path().to_path_buf(),
            settings: self.settings.clone(),
            scheme,
        });

        let chain = workflows::default_chain();
        let tasks: Vec<AnalysisTask> = self
            .catalog
            .entries()
            .iter()
            .map(|entry| chain.dispatch(entry, &context))
            .collect();

        let outcomes = coordinator::run_all(tasks).await;
        let report = aggregate::aggregate(&genome, &self.catalog, outcomes);

        report::write_report(&report, &results_dir)?;
        info!(results = %results_dir.display(), "report written");

        Ok(report)
    }

    /// Locate the typing scheme for the genome's species, if any. A
    /// malformed scheme is logged and treated as absent so typing reports
    /// not-applicable instead of taking the run down.
    fn discover_scheme(&self, genome: &crate::core::genome::Genome) -> Option<TypingScheme> {
        let typing_entry = self
            .catalog
            .entries()
            .iter()
            .find(|entry| sequence_type::claims(entry))?;

        let typing_dir = self.settings.database_root.join(&typing_entry.database);
        match TypingScheme::discover(&typing_dir, &genome.species, self.settings.thresholds) {
            Ok(scheme) => scheme,
            Err(e) => {
                warn!(species = %genome.species, error = %e, "typing scheme unavailable");
                None
            }
        }
    }
}
