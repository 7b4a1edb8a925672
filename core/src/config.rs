use serde::{Deserialize, Serialize};

/// Default cap on returned documents.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
/// Relevance values closer than this are ranked by rating instead.
pub const RELEVANCE_EPSILON: f64 = 1e-6;
/// One request per minute for a day.
pub const MIN_IN_DAY: usize = 1440;

/// Ranking knobs for a [`SearchServer`](crate::SearchServer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub relevance_epsilon: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { max_results: MAX_RESULT_DOCUMENT_COUNT, relevance_epsilon: RELEVANCE_EPSILON }
    }
}

/// Window size of a [`RequestQueue`](crate::RequestQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestQueueConfig {
    pub capacity: usize,
}

impl Default for RequestQueueConfig {
    fn default() -> Self {
        RequestQueueConfig { capacity: MIN_IN_DAY }
    }
}
