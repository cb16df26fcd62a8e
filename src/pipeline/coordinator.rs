//! Concurrent execution of dispatched analysis tasks.
//!
//! All tasks run under one join point. Every spawned entry produces exactly
//! one terminal status: workflow code folds its own failures into the
//! status, and a task that aborts anyway (a panic) is converted into a
//! failed status for its entry rather than dropped or propagated. Nothing
//! here cancels sibling tasks.

use std::collections::HashMap;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::catalog::store::CatalogEntry;
use crate::core::outcome::AnalysisStatus;
use crate::pipeline::dispatch::AnalysisTask;

/// Run every task to a terminal state and collect per-entry statuses.
///
/// Completion order is whatever the scheduler produces; callers must not
/// rely on it. The returned set always has one element per input task.
pub async fn run_all(tasks: Vec<AnalysisTask>) -> Vec<(CatalogEntry, AnalysisStatus)> {
    let total = tasks.len();
    info!(analyses = total, "running analyses concurrently");

    let mut set = JoinSet::new();
    let mut pending: HashMap<tokio::task::Id, CatalogEntry> = HashMap::new();

    for task in tasks {
        let AnalysisTask { entry, future } = task;
        let spawned_entry = entry.clone();
        let handle = set.spawn(async move { (spawned_entry, future.await) });
        pending.insert(handle.id(), entry);
    }

    let mut outcomes = Vec::with_capacity(total);
    while let Some(joined) = set.join_next_with_id().await {
        match joined {
            Ok((id, (entry, status))) => {
                pending.remove(&id);
                outcomes.push((entry, status));
            }
            Err(join_error) => {
                // A panicking workflow must still yield a status for its entry
                if let Some(entry) = pending.remove(&join_error.id()) {
                    warn!(analysis = %entry.name, error = %join_error, "analysis task aborted");
                    outcomes.push((
                        entry,
                        AnalysisStatus::Failed {
                            error: format!("analysis task aborted: {join_error}"),
                        },
                    ));
                }
            }
        }
    }

    info!(
        completed = outcomes.iter().filter(|(_, s)| s.is_success()).count(),
        total,
        "all analyses reached a terminal state"
    );
    outcomes
}
