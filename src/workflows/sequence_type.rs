//! Multi-locus sequence typing.
//!
//! For each locus in the species scheme, the locus's reference allele set
//! is searched against the genome index; locus searches are independent
//! reads and run concurrently. Each locus resolves to one allele call, and
//! the ordered allele tuple is then looked up in the scheme's profile
//! table. A single locus failure degrades that locus to missing rather
//! than aborting the workflow, so typing never takes its siblings down.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::catalog::scheme::Locus;
use crate::catalog::store::CatalogEntry;
use crate::core::hit::{best_qualifying, SequenceHit};
use crate::core::outcome::{
    AlleleAssignment, AlleleCall, AnalysisOutcome, AnalysisStatus, SequenceTypeResult,
    StAssignment,
};
use crate::core::types::HitThresholds;
use crate::parsing::fasta::read_sequences;
use crate::parsing::profile::ProfileTable;
use crate::pipeline::context::AnalysisContext;
use crate::pipeline::dispatch::{AnalysisHandler, AnalysisTask};
use crate::search::SearchError;
use crate::workflows::persist_json;

pub const ANALYSIS_NAME: &str = "Sequence_Typing";
pub const DATABASE_ID: &str = "typing_db";

/// Does this catalog entry belong to the sequence typing workflow?
#[must_use]
pub fn claims(entry: &CatalogEntry) -> bool {
    entry.name == ANALYSIS_NAME || entry.database == DATABASE_ID
}

pub struct SequenceTypeHandler;

impl AnalysisHandler for SequenceTypeHandler {
    fn name(&self) -> &'static str {
        "sequence-type"
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
    let Some(scheme) = ctx.scheme.clone() else {
        return AnalysisStatus::NotApplicable {
            reason: format!(
                "no typing scheme available for species '{}'",
                ctx.genome.species
            ),
        };
    };

    info!(scheme = %scheme.species, loci = scheme.loci.len(), "sequence typing started");

    // Fan out one search per locus; all are reads against the shared index
    let mut searches = JoinSet::new();
    for locus in scheme.loci.clone() {
        let ctx = Arc::clone(&ctx);
        searches.spawn(async move {
            let result = search_locus(&ctx, &locus).await;
            (locus.name, result)
        });
    }

    let mut calls: HashMap<String, AlleleCall> = HashMap::new();
    while let Some(joined) = searches.join_next().await {
        match joined {
            Ok((locus, Ok(hits))) => {
                calls.insert(locus.clone(), call_allele(&locus, &hits, &scheme.thresholds));
            }
            Ok((locus, Err(e))) => {
                // One locus failing degrades typing, it does not abort it
                warn!(locus = %locus, error = %e, "locus search failed, treating as missing");
                calls.insert(
                    locus.clone(),
                    AlleleCall {
                        locus,
                        assignment: AlleleAssignment::Missing,
                        hit: None,
                    },
                );
            }
            Err(join_error) => {
                warn!(error = %join_error, "locus search task aborted");
            }
        }
    }

    // Fixed scheme order; a locus whose task vanished counts as missing
    let alleles: Vec<AlleleCall> = scheme
        .loci
        .iter()
        .map(|locus| {
            calls.remove(&locus.name).unwrap_or_else(|| AlleleCall {
                locus: locus.name.clone(),
                assignment: AlleleAssignment::Missing,
                hit: None,
            })
        })
        .collect();

    let sequence_type = resolve_sequence_type(&alleles, &scheme.profiles);
    info!(scheme = %scheme.species, st = %sequence_type, "sequence typing resolved");

    let result = SequenceTypeResult {
        scheme: scheme.species.clone(),
        alleles,
        sequence_type,
    };

    if let Err(e) = persist_json(&ctx, &entry.name, "sequence_type.json", &result) {
        return AnalysisStatus::Failed {
            error: format!("failed to write typing result: {e}"),
        };
    }

    AnalysisStatus::Completed {
        outcome: AnalysisOutcome::AlleleProfile(result),
    }
}

async fn search_locus(
    ctx: &AnalysisContext,
    locus: &Locus,
) -> Result<Vec<SequenceHit>, SearchError> {
    let alleles = read_sequences(&locus.alleles_path)?;
    let work_dir = ctx.work_subdir(&format!("typing_{}", locus.name))?;
    ctx.engine
        .search(&alleles, &ctx.index, &work_dir, &locus.name)
        .await
}

/// Resolve one locus's allele call from its search hits.
///
/// The best qualifying hit names the allele; a full-length perfect match is
/// a confident call, anything qualifying below that is uncertain, and no
/// qualifying hit (or an allele id with no parseable number) is missing.
#[must_use]
pub fn call_allele(locus: &str, hits: &[SequenceHit], thresholds: &HitThresholds) -> AlleleCall {
    let Some(best) = best_qualifying(hits, thresholds) else {
        return AlleleCall {
            locus: locus.to_string(),
            assignment: AlleleAssignment::Missing,
            hit: None,
        };
    };

    let assignment = match best.query_allele_number() {
        Some(number) if best.is_exact() => AlleleAssignment::Called(number),
        Some(number) => AlleleAssignment::Uncertain(number),
        None => {
            warn!(locus = %locus, query = %best.query_id, "allele id has no number");
            AlleleAssignment::Missing
        }
    };

    AlleleCall {
        locus: locus.to_string(),
        assignment,
        hit: Some(best.clone()),
    }
}

/// Resolve the ordered allele tuple against the profile table.
///
/// Any missing locus makes the result incomplete regardless of the others;
/// a complete tuple resolves to its ST when the table knows it and to
/// novel otherwise.
#[must_use]
pub fn resolve_sequence_type(alleles: &[AlleleCall], profiles: &ProfileTable) -> StAssignment {
    let mut profile = Vec::with_capacity(alleles.len());
    for call in alleles {
        match call.assignment.allele_number() {
            Some(number) => profile.push(number),
            None => return StAssignment::Incomplete,
        }
    }

    match profiles.lookup(&profile) {
        Some(st) => StAssignment::Type(st),
        None => StAssignment::Novel,
    }
}
