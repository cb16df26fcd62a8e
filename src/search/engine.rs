//! Asynchronous sequence search against the genome index.
//!
//! Each call writes its query set into its own working directory, runs one
//! `blastn` invocation with a bounded wait, and parses the tabular output.
//! The index is read-only, so any number of searches may run concurrently
//! against it.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::core::hit::SequenceHit;
use crate::parsing::fasta::{write_fasta, SequenceRecord};
use crate::search::index::SearchIndex;
use crate::search::tabular::parse_hits;
use crate::search::SearchError;
use crate::utils::process::run_checked;

/// Runs query sets against the genome index.
#[derive(Debug, Clone)]
pub struct SequenceSearchEngine {
    tool: String,
    deadline: Duration,
    threads: usize,
}

impl SequenceSearchEngine {
    pub fn new(deadline: Duration, threads: usize) -> Self {
        Self {
            tool: "blastn".to_string(),
            deadline,
            threads: threads.max(1),
        }
    }

    /// Search `queries` against the index, staging files under `work_dir`
    /// with the given `label`.
    ///
    /// An empty hit list is a valid result, not an error. Execution
    /// failures (launch, non-zero exit, timeout) and malformed output are
    /// reported as distinct [`SearchError`] variants.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Io` if staging files cannot be written,
    /// `SearchError::Command` for process failures, or
    /// `SearchError::Parse` for malformed tabular output.
    pub async fn search(
        &self,
        queries: &[SequenceRecord],
        index: &SearchIndex,
        work_dir: &Path,
        label: &str,
    ) -> Result<Vec<SequenceHit>, SearchError> {
        std::fs::create_dir_all(work_dir)?;

        let query_path = work_dir.join(format!("{label}_query.fasta"));
        let output_path = work_dir.join(format!("{label}_hits.tsv"));
        write_fasta(&query_path, queries)?;

        let mut cmd = Command::new(&self.tool);
        cmd.arg("-query")
            .arg(&query_path)
            .arg("-db")
            .arg(index.prefix())
            .arg("-out")
            .arg(&output_path)
            .arg("-outfmt")
            .arg("6")
            .arg("-num_threads")
            .arg(self.threads.to_string());

        run_checked(&self.tool, &mut cmd, self.deadline).await?;

        let text = std::fs::read_to_string(&output_path)?;
        let lengths: HashMap<String, u64> = queries
            .iter()
            .map(|q| (q.id.clone(), q.len()))
            .collect();
        let hits = parse_hits(&text, &lengths)?;

        debug!(label = %label, hits = hits.len(), "search finished");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::fasta::FastaError;

    #[tokio::test]
    async fn test_search_fails_cleanly_without_tool() {
        let dir = tempfile::tempdir().unwrap();
        let engine = SequenceSearchEngine {
            tool: "definitely-not-blastn".to_string(),
            deadline: Duration::from_secs(5),
            threads: 1,
        };
        let index = SearchIndex {
            db_prefix: dir.path().join("idx"),
        };
        let queries = vec![SequenceRecord {
            id: "gapA_1".to_string(),
            description: None,
            sequence: "ACGT".to_string(),
        }];

        let err = engine
            .search(&queries, &index, dir.path(), "typing")
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Command(_)));

        // The query set must have been staged before the launch failed
        assert!(dir.path().join("typing_query.fasta").exists());
    }

    #[test]
    fn test_engine_clamps_thread_count() {
        let engine = SequenceSearchEngine::new(Duration::from_secs(1), 0);
        assert_eq!(engine.threads, 1);
    }

    #[test]
    fn test_fasta_error_converts() {
        // SearchError must absorb staging failures
        let err: SearchError = FastaError::EmptyDatabase("x".to_string()).into();
        assert!(matches!(err, SearchError::Fasta(_)));
    }
}
