//! Crawler coordinator - the single synchronization point of a crawl
//!
//! The coordinator owns every piece of shared crawl state behind one lock:
//! - The FIFO frontier of URLs awaiting a visit attempt
//! - The two-tier visited set and its page records
//! - The outstanding-worker count used for termination detection
//!
//! Workers call `claim`, `submit`, `record_result` and (through their
//! `WorkerTicket`) `worker_finished`. The dispatch loop in `run` pulls from the
//! frontier and hands one task per URL to the worker pool until the frontier
//! is empty and no worker is outstanding.

use crate::config::CrawlerConfig;
use crate::crawler::pool::WorkerPool;
use crate::crawler::worker::Visitor;
use crate::output::CrawlStats;
use crate::state::{CrawlState, NextStep, PageRecords, VisitedSet};
use crate::url::Scope;
use crate::ConfigError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::Notify;

pub struct Coordinator {
    scope: Arc<Scope>,
    state: Mutex<CrawlState>,

    /// Wakes the dispatch loop after `submit` or the last `worker_finished`
    wake: Notify,
}

impl Coordinator {
    /// Creates a coordinator with the domain's seed URL on the frontier
    ///
    /// # Arguments
    ///
    /// * `scope` - The crawl scope shared with every worker
    /// * `config` - Sizing of the visited filter
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to `run`
    /// * `Err(ConfigError)` - The visited filter could not be sized
    pub fn new(scope: Arc<Scope>, config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let visited = VisitedSet::new(config.expected_pages, config.false_positive_rate)?;
        let mut state = CrawlState::new(visited);
        state.push_urls(std::iter::once(scope.domain().seed_url().to_string()));

        Ok(Self {
            scope,
            state: Mutex::new(state),
            wake: Notify::new(),
        })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Claims the URL's normalized key for visiting
    ///
    /// Exactly one caller ever receives `true` for a given key; that caller
    /// owns the visit. The key's empty page record exists once this returns.
    pub fn claim(&self, url: &str) -> bool {
        let key = self.scope.key_of(url);
        self.lock().visited_mut().claim(key)
    }

    /// Appends URLs to the frontier and wakes the dispatch loop
    pub fn submit<I>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let (added, queued) = {
            let mut state = self.lock();
            let added = state.push_urls(urls);
            (added, state.frontier_len())
        };
        tracing::debug!("Submitted {} URLs, frontier at {}", added, queued);
        if added > 0 {
            self.wake.notify_one();
        }
        added
    }

    /// Overwrites the page record of a claimed key
    pub fn record_result(&self, key: &str, references: Vec<String>) {
        if !self.lock().visited_mut().record(key, references) {
            tracing::warn!("Dropping references for unclaimed page {}", key);
        }
    }

    /// Marks one outstanding worker finished
    ///
    /// Called only from `WorkerTicket::drop`, so it runs exactly once per
    /// dispatched task.
    fn worker_finished(&self) {
        let remaining = self.lock().finish_worker();
        if remaining == 0 {
            self.wake.notify_one();
        }
    }

    pub fn note_fetch_failure(&self) {
        self.lock().note_fetch_failure();
    }

    /// Probabilistic membership of the URL's key
    pub fn might_contain(&self, url: &str) -> bool {
        let key = self.scope.key_of(url);
        self.lock().visited().might_contain(&key)
    }

    /// References recorded so far for the URL's key
    pub fn references(&self, url: &str) -> Option<Vec<String>> {
        let key = self.scope.key_of(url);
        self.lock().visited().references(&key).map(<[String]>::to_vec)
    }

    pub fn frontier_len(&self) -> usize {
        self.lock().frontier_len()
    }

    pub fn outstanding(&self) -> usize {
        self.lock().outstanding()
    }

    /// Moves the page records out once the crawl has terminated
    pub fn take_records(&self) -> PageRecords {
        self.lock().visited_mut().take_records()
    }

    /// Runs the dispatch loop until the frontier is empty and no worker is outstanding
    ///
    /// Each step is decided under the lock: a URL is either dispatched (and
    /// counted outstanding in the same critical section), or the loop waits
    /// for a wake, or it finishes. `Notify` keeps a permit for a wake that
    /// arrives before the loop starts waiting, so no wake is lost.
    pub async fn run(self: &Arc<Self>, pool: &WorkerPool, visitor: &Arc<Visitor>) -> CrawlStats {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.scope.domain().seed_url(),
            pool.size()
        );

        loop {
            let step = self.lock().next_step();
            tracing::trace!("Dispatch loop: {:?}", step);

            match step {
                NextStep::Dispatch(url) => {
                    let ticket = WorkerTicket {
                        coordinator: Arc::clone(self),
                    };
                    let visitor = Arc::clone(visitor);

                    let dispatched = pool
                        .execute(async move {
                            visitor.visit(ticket.coordinator(), &url).await;
                            drop(ticket);
                        })
                        .await;

                    // A rejected task drops its future, and the ticket with it
                    if dispatched.is_none() {
                        tracing::error!("Worker pool refused a slot; stopping dispatch");
                        break;
                    }
                }
                NextStep::Wait => self.wake.notified().await,
                NextStep::Finished => {
                    tracing::info!("Frontier is empty and no workers remain, crawl complete");
                    break;
                }
            }
        }

        let state = self.lock();
        let stats = CrawlStats {
            pages_visited: state.visited().len(),
            tasks_dispatched: state.dispatched(),
            fetch_failures: state.fetch_failures(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} pages visited in {:?}",
            stats.pages_visited,
            stats.elapsed
        );

        stats
    }

    fn lock(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outstanding-worker token for one dispatched task
///
/// Dropping it calls `worker_finished`, so the count is released on every
/// exit path of a visit, including panics and cancellation.
pub struct WorkerTicket {
    coordinator: Arc<Coordinator>,
}

impl WorkerTicket {
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

impl Drop for WorkerTicket {
    fn drop(&mut self) {
        self.coordinator.worker_finished();
    }
}
