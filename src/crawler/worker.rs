//! Worker task: claim, fetch, extract, report
//!
//! The outstanding-worker count is released by the caller's `WorkerTicket`,
//! never here, so every early return below is safe.

use crate::crawler::coordinator::Coordinator;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::strategy::VisitStrategy;
use crate::url::UrlVerifier;
use std::sync::Arc;

/// How a single visit ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Another worker owns this key
    AlreadyClaimed,

    /// The fetch failed; the page keeps its empty record
    FetchFailed,

    /// The page was fetched and its references recorded
    Visited {
        references: usize,
        submitted: usize,
    },
}

/// Everything a worker needs besides the coordinator, shared by all tasks
pub struct Visitor {
    fetcher: Arc<dyn PageFetcher>,
    verifier: Arc<dyn UrlVerifier>,
    strategy: VisitStrategy,
}

impl Visitor {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        verifier: Arc<dyn UrlVerifier>,
        strategy: VisitStrategy,
    ) -> Self {
        Self {
            fetcher,
            verifier,
            strategy,
        }
    }

    pub fn strategy(&self) -> VisitStrategy {
        self.strategy
    }

    /// Visits one URL taken off the frontier
    pub async fn visit(&self, coordinator: &Coordinator, url: &str) -> VisitOutcome {
        if !coordinator.claim(url) {
            tracing::debug!("Already claimed: {}", url);
            return VisitOutcome::AlreadyClaimed;
        }

        tracing::info!("Visiting {}", url);

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("{}", e);
                coordinator.note_fetch_failure();
                return VisitOutcome::FetchFailed;
            }
        };

        let scope = coordinator.scope();
        let extraction = self
            .strategy
            .extract(url, &html, scope, self.verifier.as_ref());

        let references = extraction.references.len();
        let submitted = coordinator.submit(extraction.to_visit);
        coordinator.record_result(&scope.key_of(url), extraction.references);

        VisitOutcome::Visited {
            references,
            submitted,
        }
    }
}
