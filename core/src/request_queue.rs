//! Sliding window of recent search requests.

use crate::config::RequestQueueConfig;
use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::predicate::DocumentPredicate;
use crate::search::SearchServer;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestRecord {
    tick: u64,
    result_count: usize,
}

/// Runs searches against a [`SearchServer`] and remembers how many of the
/// last `capacity` requests found nothing.
///
/// The window is first-in first-out; once full, every new request evicts
/// the oldest one.
#[derive(Debug)]
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<RequestRecord>,
    capacity: usize,
    no_result_requests: usize,
    current_tick: u64,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self::with_config(server, RequestQueueConfig::default())
    }

    /// A capacity of zero is bumped to one.
    pub fn with_config(server: &'a SearchServer, config: RequestQueueConfig) -> Self {
        let capacity = config.capacity.max(1);
        RequestQueue {
            server,
            requests: VecDeque::with_capacity(capacity),
            capacity,
            no_result_requests: 0,
            current_tick: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_with_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.add_find_request_by(raw_query, status)
    }

    /// Search and record the outcome. A query that fails to parse is not recorded.
    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: DocumentPredicate,
    {
        let found = self.server.find_top_documents_by(raw_query, predicate)?;
        self.record(found.len());
        Ok(found)
    }

    fn record(&mut self, result_count: usize) {
        self.current_tick += 1;
        if self.requests.len() == self.capacity {
            if let Some(evicted) = self.requests.pop_front() {
                if evicted.result_count == 0 {
                    self.no_result_requests -= 1;
                }
                debug!(tick = evicted.tick, "evicted oldest request");
            }
        }
        if result_count == 0 {
            self.no_result_requests += 1;
        }
        self.requests.push_back(RequestRecord { tick: self.current_tick, result_count });
    }

    /// Requests in the window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of requests recorded since creation, evicted ones included.
    pub fn total_requests(&self) -> u64 {
        self.current_tick
    }
}
