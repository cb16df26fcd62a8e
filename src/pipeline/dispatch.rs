//! Handler-chain dispatch of catalog entries to workflows.
//!
//! The chain is a flat ordered list of handler values, each polymorphic
//! over one operation: claim a catalog entry and return a runnable task, or
//! decline. The first handler to claim an entry wins and dispatch stops; a
//! terminal fallback handler claims unconditionally, so exactly one task
//! exists per entry. Adding a new specialized analysis means inserting one
//! handler into the list; the dispatch loop itself never changes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::store::CatalogEntry;
use crate::core::outcome::AnalysisStatus;
use crate::pipeline::context::AnalysisContext;

/// A workflow execution, boxed so heterogeneous workflows share one task
/// shape. Resolves to the analysis's terminal status; never panics by
/// contract (failures fold into the status).
pub type TaskFuture = Pin<Box<dyn Future<Output = AnalysisStatus> + Send + 'static>>;

/// A claimed catalog entry, ready to run.
pub struct AnalysisTask {
    pub entry: CatalogEntry,
    pub future: TaskFuture,
}

impl AnalysisTask {
    pub fn new(
        entry: CatalogEntry,
        future: impl Future<Output = AnalysisStatus> + Send + 'static,
    ) -> Self {
        Self {
            entry,
            future: Box::pin(future),
        }
    }
}

impl std::fmt::Debug for AnalysisTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisTask")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// A workflow handler: claims catalog entries it knows how to run.
pub trait AnalysisHandler: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Claim `entry` and produce its task, or decline with `None`.
    fn try_handle(&self, entry: &CatalogEntry, ctx: &Arc<AnalysisContext>)
        -> Option<AnalysisTask>;
}

/// Ordered handler list with a terminal catch-all.
///
/// The terminal handler is held separately so the "every entry gets exactly
/// one task" contract is guaranteed by construction rather than by
/// convention.
pub struct HandlerChain {
    specialized: Vec<Box<dyn AnalysisHandler>>,
    terminal: Box<dyn AnalysisHandler>,
}

impl HandlerChain {
    pub fn new(specialized: Vec<Box<dyn AnalysisHandler>>, terminal: Box<dyn AnalysisHandler>) -> Self {
        Self {
            specialized,
            terminal,
        }
    }

    /// Offer `entry` to handlers in priority order; the first claim wins.
    ///
    /// # Panics
    ///
    /// Panics if the terminal handler declines an entry. That is a
    /// programming error in the handler, not a runtime condition.
    #[must_use]
    pub fn dispatch(&self, entry: &CatalogEntry, ctx: &Arc<AnalysisContext>) -> AnalysisTask {
        for handler in &self.specialized {
            if let Some(task) = handler.try_handle(entry, ctx) {
                debug!(analysis = %entry.name, handler = handler.name(), "entry claimed");
                return task;
            }
        }

        match self.terminal.try_handle(entry, ctx) {
            Some(task) => {
                debug!(analysis = %entry.name, handler = self.terminal.name(), "entry claimed");
                task
            }
            None => unreachable!("terminal handler must claim every entry"),
        }
    }
}
