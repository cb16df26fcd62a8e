//! Terminal fallback workflow: one search, raw hits persisted.
//!
//! Any catalog entry no specialized handler claims lands here. The entry's
//! reference set is searched once against the genome index and every
//! qualifying hit is kept, without deduplication or summarization.

use std::sync::Arc;

use tracing::info;

use crate::catalog::store::CatalogEntry;
use crate::core::outcome::{AnalysisOutcome, AnalysisStatus};
use crate::pipeline::context::AnalysisContext;
use crate::pipeline::dispatch::{AnalysisHandler, AnalysisTask};
use crate::workflows::{collect_and_search, persist_hits};

/// Terminal handler: claims every entry offered to it.
pub struct StandardHandler;

impl AnalysisHandler for StandardHandler {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn try_handle(
        &self,
        entry: &CatalogEntry,
        ctx: &Arc<AnalysisContext>,
    ) -> Option<AnalysisTask> {
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

    let qualifying: Vec<_> = hits
        .into_iter()
        .filter(|h| h.qualifies(&ctx.settings.thresholds))
        .collect();

    if let Err(e) = persist_hits(&ctx, &entry.name, &qualifying) {
        return AnalysisStatus::Failed {
            error: format!("failed to persist hits: {e}"),
        };
    }

    info!(analysis = %entry.name, hits = qualifying.len(), "analysis complete");
    AnalysisStatus::Completed {
        outcome: AnalysisOutcome::RawHits(qualifying),
    }
}
