use crate::state::VisitedSet;
use std::collections::VecDeque;

/// What the dispatch loop should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// A URL was taken off the frontier and counted as outstanding
    Dispatch(String),

    /// Frontier empty but workers are still running
    Wait,

    /// Frontier empty and no worker outstanding
    Finished,
}

/// Mutable state of one crawl run
///
/// Lives behind the coordinator's single lock; every method here is a short,
/// non-blocking critical section.
pub struct CrawlState {
    /// URLs awaiting a visit attempt, FIFO
    frontier: VecDeque<String>,

    /// Claimed keys and their page records
    visited: VisitedSet,

    /// Worker tasks dispatched but not yet finished
    outstanding: usize,

    /// Total worker tasks dispatched
    dispatched: usize,

    /// Pages whose fetch failed
    fetch_failures: usize,
}

impl CrawlState {
    pub fn new(visited: VisitedSet) -> Self {
        Self {
            frontier: VecDeque::new(),
            visited,
            outstanding: 0,
            dispatched: 0,
            fetch_failures: 0,
        }
    }

    /// Appends URLs to the frontier, returning how many were added
    pub fn push_urls<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.frontier.len();
        self.frontier.extend(urls);
        self.frontier.len() - before
    }

    /// Decides the next dispatch loop transition
    ///
    /// Popping a URL and incrementing the outstanding count happen together,
    /// so a dispatched URL is never invisible to the termination check.
    pub fn next_step(&mut self) -> NextStep {
        match self.frontier.pop_front() {
            Some(url) => {
                self.outstanding += 1;
                self.dispatched += 1;
                NextStep::Dispatch(url)
            }
            None if self.outstanding == 0 => NextStep::Finished,
            None => NextStep::Wait,
        }
    }

    /// Marks one outstanding worker finished, returning how many remain
    pub fn finish_worker(&mut self) -> usize {
        match self.outstanding.checked_sub(1) {
            Some(remaining) => self.outstanding = remaining,
            None => tracing::error!("worker finished with no outstanding workers"),
        }
        self.outstanding
    }

    pub fn note_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn visited_mut(&mut self) -> &mut VisitedSet {
        &mut self.visited
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    pub fn fetch_failures(&self) -> usize {
        self.fetch_failures
    }
}
