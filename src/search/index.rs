//! Search index construction for the input genome.
//!
//! The index is built once per run by an external `makeblastdb` invocation
//! and is read-only afterwards. The process exit code is authoritative, and
//! the expected on-disk artifacts must exist after a zero exit; either
//! failure mode aborts the whole run before any workflow starts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tracing::info;

use crate::core::genome::Genome;
use crate::search::SearchError;
use crate::utils::process::run_checked;

/// Artifact suffixes a nucleotide index must leave on disk.
const INDEX_SUFFIXES: &[&str] = &["nin", "nhr", "nsq"];

/// Handle to a built genome index. Cheap to clone; many concurrent readers,
/// zero writers after construction.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    /// Path prefix the search tool addresses the index by
    pub(crate) db_prefix: PathBuf,
}

impl SearchIndex {
    #[must_use]
    pub fn prefix(&self) -> &Path {
        &self.db_prefix
    }
}

/// Builds the search index from a genome sequence file.
pub struct SearchIndexBuilder {
    tool: String,
    deadline: Duration,
}

impl SearchIndexBuilder {
    pub fn new(deadline: Duration) -> Self {
        Self {
            tool: "makeblastdb".to_string(),
            deadline,
        }
    }

    /// Build the index into `out_dir`, blocking the pipeline until done.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Command` if the builder process fails to
    /// launch, exits non-zero, or times out, and
    /// `SearchError::MissingArtifact` if the process exits zero but an
    /// expected index file is absent.
    pub async fn build(&self, genome: &Genome, out_dir: &Path) -> Result<SearchIndex, SearchError> {
        std::fs::create_dir_all(out_dir)?;
        let db_prefix = out_dir.join(&genome.id);

        let mut cmd = Command::new(&self.tool);
        cmd.arg("-in")
            .arg(&genome.source)
            .arg("-dbtype")
            .arg("nucl")
            .arg("-out")
            .arg(&db_prefix)
            .arg("-parse_seqids");

        run_checked(&self.tool, &mut cmd, self.deadline).await?;

        for suffix in INDEX_SUFFIXES {
            // Appended, not with_extension: genome ids may contain dots
            let artifact = PathBuf::from(format!("{}.{suffix}", db_prefix.display()));
            if !artifact.exists() {
                return Err(SearchError::MissingArtifact(artifact));
            }
        }

        info!(genome = %genome.id, prefix = %db_prefix.display(), "search index built");
        Ok(SearchIndex { db_prefix })
    }
}
