use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::scheme::TypingScheme;
use crate::catalog::store::CatalogEntry;
use crate::core::genome::Genome;
use crate::core::types::HitThresholds;
use crate::search::engine::SequenceSearchEngine;
use crate::search::index::SearchIndex;

/// Settings for the external risk classifier.
#[derive(Debug, Clone)]
pub struct RiskToolSettings {
    /// Classifier command name
    pub command: String,
    /// Tools that must resolve on PATH before invocation
    pub required_tools: Vec<String>,
    pub timeout: Duration,
    /// Numeric decision threshold passed through to the classifier
    pub threshold: f64,
}

impl Default for RiskToolSettings {
    fn default() -> Self {
        Self {
            command: "pathogenfinder2".to_string(),
            required_tools: vec![
                "pathogenfinder2".to_string(),
                "prodigal".to_string(),
                "diamond".to_string(),
            ],
            timeout: Duration::from_secs(1800),
            threshold: 0.5,
        }
    }
}

/// Run-wide settings, fixed before the pipeline starts.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Root folder holding one subfolder per reference database
    pub database_root: PathBuf,
    /// Root folder for per-genome result directories
    pub results_root: PathBuf,
    /// Bounded wait for each search tool invocation
    pub search_timeout: Duration,
    /// Threads handed to each search invocation and the classifier
    pub threads: usize,
    pub thresholds: HitThresholds,
    pub risk: RiskToolSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            database_root: PathBuf::from("database"),
            results_root: PathBuf::from("analysis_results"),
            search_timeout: Duration::from_secs(600),
            threads: 4,
            thresholds: HitThresholds::default(),
            risk: RiskToolSettings::default(),
        }
    }
}

/// Shared state for all workflows of one run. Immutable after construction:
/// workflows read from it and write only into their own directories.
#[derive(Debug)]
pub struct AnalysisContext {
    pub genome: Genome,
    /// Shared read-only index; safe for any number of concurrent searches
    pub index: SearchIndex,
    pub engine: SequenceSearchEngine,
    /// Final results for this genome/species
    pub results_dir: PathBuf,
    /// Scratch space, deleted when the run finishes
    pub work_dir: PathBuf,
    pub settings: PipelineSettings,
    /// Typing scheme for the detected species, when one exists
    pub scheme: Option<TypingScheme>,
}

impl AnalysisContext {
    /// Reference database folder for a catalog entry
    #[must_use]
    pub fn database_dir(&self, entry: &CatalogEntry) -> PathBuf {
        self.settings.database_root.join(&entry.database)
    }

    /// Create (if needed) and return the analysis's own results directory.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub fn analysis_dir(&self, name: &str) -> std::io::Result<PathBuf> {
        let dir = self.results_dir.join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Create (if needed) and return an isolated scratch directory.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub fn work_subdir(&self, label: &str) -> std::io::Result<PathBuf> {
        let dir = self.work_dir.join(label);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::types::SpeciesTag;

    /// Context over temp directories, for handler and workflow tests.
    /// No external tool runs against it unless a test drives one.
    pub(crate) fn make_context(root: &std::path::Path) -> AnalysisContext {
        let results_dir = root.join("results");
        let work_dir = root.join("work");
        std::fs::create_dir_all(&results_dir).unwrap();
        std::fs::create_dir_all(&work_dir).unwrap();

        AnalysisContext {
            genome: Genome {
                id: "SAMPLE123".to_string(),
                species: SpeciesTag::known("klebsiella"),
                source: root.join("genome.fasta"),
                contig_count: 1,
                total_bases: 1000,
            },
            index: SearchIndex {
                db_prefix: root.join("index/SAMPLE123"),
            },
            engine: SequenceSearchEngine::new(Duration::from_secs(5), 1),
            results_dir,
            work_dir,
            settings: PipelineSettings {
                database_root: root.join("database"),
                results_root: root.join("results"),
                ..PipelineSettings::default()
            },
            scheme: None,
        }
    }
}
