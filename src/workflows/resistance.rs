//! Resistance gene summarization.
//!
//! One search of the combined resistance reference set, then a per-family
//! digest: each gene family keeps only its best qualifying hit. Zero hits
//! is a valid outcome (no resistance determinants detected), not a failure.

use std::collections::btree_map::Entry;
use std::sync::Arc;

use tracing::info;

use crate::catalog::store::CatalogEntry;
use crate::core::hit::{rank_hits, SequenceHit};
use crate::core::outcome::{AnalysisOutcome, AnalysisStatus, ResistanceDigest, ResistanceRecord};
use crate::core::types::HitThresholds;
use crate::pipeline::context::AnalysisContext;
use crate::pipeline::dispatch::{AnalysisHandler, AnalysisTask};
use crate::workflows::{collect_and_search, persist_hits, persist_json};

pub const ANALYSIS_NAME: &str = "Antimicrobial_Resistance";
pub const DATABASE_ID: &str = "resfinder_db";

/// Does this catalog entry belong to the resistance workflow?
#[must_use]
pub fn claims(entry: &CatalogEntry) -> bool {
    entry.name == ANALYSIS_NAME || entry.database == DATABASE_ID
}

pub struct ResistanceHandler;

impl AnalysisHandler for ResistanceHandler {
    fn name(&self) -> &'static str {
        "resistance"
    }

    fn try_handle(
        &self,
        entry: &CatalogEntry,
        ctx: &Arc<AnalysisContext>,
    ) -> Option<AnalysisTask> {
        if !claims(entry) {
            return None;
        }
        Some(AnalysisTask::new(
            entry.clone(),
            run(Arc::clone(ctx), entry.clone()),
        ))
    }
}

async fn run(ctx: Arc<AnalysisContext>, entry: CatalogEntry) -> AnalysisStatus {
    let hits = match collect_and_search(&ctx, &entry).await {
        Ok(hits) => hits,
        Err(status) => return status,
    };

    let digest = build_digest(&hits, &ctx.settings.thresholds);

    if let Err(e) = persist_hits(&ctx, &entry.name, &hits) {
        return AnalysisStatus::Failed {
            error: format!("failed to persist hits: {e}"),
        };
    }
    if let Err(e) = persist_json(&ctx, &entry.name, "resistance_summary.json", &digest) {
        return AnalysisStatus::Failed {
            error: format!("failed to write digest: {e}"),
        };
    }

    info!(analysis = %entry.name, families = digest.len(), "resistance summary complete");
    AnalysisStatus::Completed {
        outcome: AnalysisOutcome::ResistanceSummary(digest),
    }
}

/// Group hits by gene family and keep the best qualifying hit per family.
///
/// Best is decided by the standard tie-break (identity, then alignment
/// length, then e-value); hits below the thresholds never enter the digest.
#[must_use]
pub fn build_digest(hits: &[SequenceHit], thresholds: &HitThresholds) -> ResistanceDigest {
    let mut best: std::collections::BTreeMap<String, &SequenceHit> =
        std::collections::BTreeMap::new();

    for hit in hits.iter().filter(|h| h.qualifies(thresholds)) {
        match best.entry(hit.query_gene().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(hit);
            }
            Entry::Occupied(mut slot) => {
                if rank_hits(hit, slot.get()) == std::cmp::Ordering::Less {
                    slot.insert(hit);
                }
            }
        }
    }

    let genes = best
        .into_iter()
        .map(|(family, hit)| {
            (
                family,
                ResistanceRecord {
                    variant: hit.query_id.clone(),
                    identity: hit.identity,
                    coverage: hit.coverage,
                },
            )
        })
        .collect();

    ResistanceDigest { genes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_hit(query_id: &str, identity: f64, coverage: f64) -> SequenceHit {
        SequenceHit {
            query_id: query_id.to_string(),
            subject_id: "contig_1".to_string(),
            identity,
            alignment_length: 800,
            mismatches: 0,
            gap_opens: 0,
            query_start: 1,
            query_end: 800,
            subject_start: 1,
            subject_end: 800,
            evalue: 1e-100,
            bit_score: 1000.0,
            coverage,
        }
    }

    #[test]
    fn test_claims_by_name_or_database() {
        assert!(claims(&CatalogEntry {
            database: "other".to_string(),
            name: ANALYSIS_NAME.to_string(),
        }));
        assert!(claims(&CatalogEntry {
            database: DATABASE_ID.to_string(),
            name: "Anything".to_string(),
        }));
        assert!(!claims(&CatalogEntry {
            database: "plasmidfinder_db".to_string(),
            name: "Plasmid_Replicons".to_string(),
        }));
    }

    #[test]
    fn test_zero_hits_gives_empty_digest() {
        let digest = build_digest(&[], &HitThresholds::default());
        assert!(digest.is_empty());
    }

    #[test]
    fn test_best_hit_per_family() {
        let hits = vec![
            make_hit("blaKPC-2_1_AY034847", 98.5, 1.0),
            make_hit("blaKPC-2_2_AY034848", 100.0, 1.0),
            make_hit("tetA_1_X00006", 95.0, 0.97),
        ];
        let digest = build_digest(&hits, &HitThresholds::default());

        assert_eq!(digest.len(), 2);
        let kpc = &digest.genes["blaKPC-2"];
        assert_eq!(kpc.variant, "blaKPC-2_2_AY034848");
        assert!((kpc.identity - 100.0).abs() < f64::EPSILON);
        assert_eq!(digest.genes["tetA"].variant, "tetA_1_X00006");
    }

    #[test]
    fn test_unqualifying_hits_excluded() {
        let hits = vec![
            make_hit("blaKPC-2_1_AY034847", 80.0, 1.0),  // identity too low
            make_hit("tetA_1_X00006", 99.0, 0.5),        // coverage too low
        ];
        let digest = build_digest(&hits, &HitThresholds::default());
        assert!(digest.is_empty());
    }

    #[test]
    fn test_threshold_boundary_included() {
        let hits = vec![make_hit("sul1_5_U12338", 90.0, 0.90)];
        let digest = build_digest(&hits, &HitThresholds::default());
        assert_eq!(digest.len(), 1);
    }
}
