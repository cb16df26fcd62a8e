//! The workflow handlers behind the dispatch chain.
//!
//! Three specialized workflows plus the terminal fallback:
//!
//! - [`sequence_type::SequenceTypeHandler`]: multi-locus typing
//! - [`resistance::ResistanceHandler`]: resistance gene digest
//! - [`risk::RiskHandler`]: external risk classifier
//! - [`standard::StandardHandler`]: one search, raw hits (claims anything)
//!
//! Adding a new specialized analysis means writing one handler here and
//! inserting it into [`default_chain`]; the dispatch loop never changes.

pub mod resistance;
pub mod risk;
pub mod sequence_type;
pub mod standard;

use serde::Serialize;

use crate::catalog::store::CatalogEntry;
use crate::core::hit::SequenceHit;
use crate::core::outcome::AnalysisStatus;
use crate::parsing::fasta::{collect_database_sequences, FastaError};
use crate::pipeline::context::AnalysisContext;
use crate::pipeline::dispatch::HandlerChain;
use crate::search::tabular::format_hits;

pub use resistance::ResistanceHandler;
pub use risk::RiskHandler;
pub use sequence_type::SequenceTypeHandler;
pub use standard::StandardHandler;

/// The built-in chain, most specialized first, standard workflow terminal.
#[must_use]
pub fn default_chain() -> HandlerChain {
    HandlerChain::new(
        vec![
            Box::new(SequenceTypeHandler),
            Box::new(ResistanceHandler),
            Box::new(RiskHandler),
        ],
        Box::new(StandardHandler),
    )
}

/// Read the entry's reference set and run one search against the index.
///
/// Failures are already mapped to the terminal status the workflow should
/// report: an absent or empty database folder is a configuration error,
/// everything else is an execution failure.
pub(crate) async fn collect_and_search(
    ctx: &AnalysisContext,
    entry: &CatalogEntry,
) -> Result<Vec<SequenceHit>, AnalysisStatus> {
    let queries = match collect_database_sequences(&ctx.database_dir(entry)) {
        Ok(queries) => queries,
        Err(FastaError::EmptyDatabase(dir)) => {
            return Err(AnalysisStatus::ConfigurationError {
                reason: format!("no reference sequences in {dir}"),
            })
        }
        Err(e) => {
            return Err(AnalysisStatus::Failed {
                error: format!("failed to read reference set: {e}"),
            })
        }
    };

    let work_dir = ctx.work_subdir(&entry.name).map_err(|e| AnalysisStatus::Failed {
        error: format!("failed to create working directory: {e}"),
    })?;

    ctx.engine
        .search(&queries, &ctx.index, &work_dir, &entry.name)
        .await
        .map_err(|e| AnalysisStatus::Failed {
            error: e.to_string(),
        })
}

/// Persist hits to `hits.tsv` in the analysis's results directory.
pub(crate) fn persist_hits(
    ctx: &AnalysisContext,
    analysis: &str,
    hits: &[SequenceHit],
) -> std::io::Result<()> {
    let dir = ctx.analysis_dir(analysis)?;
    std::fs::write(dir.join("hits.tsv"), format_hits(hits))
}

/// Persist a JSON digest in the analysis's results directory.
pub(crate) fn persist_json<T: Serialize>(
    ctx: &AnalysisContext,
    analysis: &str,
    filename: &str,
    value: &T,
) -> std::io::Result<()> {
    let dir = ctx.analysis_dir(analysis)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(dir.join(filename), json)
}
