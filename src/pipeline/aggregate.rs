//! Pure merge of per-analysis outcomes into the final report.
//!
//! No I/O and no external calls: given the same genome identity, catalog,
//! and outcome set, the same report comes out. Records follow catalog
//! order regardless of completion order, and each analysis name is
//! write-once: the first reported status wins and later duplicates are
//! ignored.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::warn;

use crate::catalog::store::{AnalysisCatalog, CatalogEntry};
use crate::core::genome::Genome;
use crate::core::outcome::{AnalysisRecord, AnalysisStatus, PipelineReport};

/// Merge coordinator outcomes with the genome identity into one report.
#[must_use]
pub fn aggregate(
    genome: &Genome,
    catalog: &AnalysisCatalog,
    outcomes: Vec<(CatalogEntry, AnalysisStatus)>,
) -> PipelineReport {
    let mut by_name: HashMap<String, AnalysisStatus> = HashMap::new();
    for (entry, status) in outcomes {
        match by_name.entry(entry.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(status);
            }
            Entry::Occupied(_) => {
                warn!(analysis = %entry.name, "duplicate outcome ignored");
            }
        }
    }

    let analyses = catalog
        .entries()
        .iter()
        .map(|entry| AnalysisRecord {
            analysis: entry.name.clone(),
            status: by_name.remove(&entry.name).unwrap_or_else(|| {
                AnalysisStatus::Failed {
                    error: "no outcome recorded".to_string(),
                }
            }),
        })
        .collect();

    PipelineReport {
        genome_id: genome.id.clone(),
        species: genome.species.clone(),
        analyses,
    }
}
