//! In-memory TF-IDF document index with plus/minus query terms, status and
//! rating predicates, and a sliding window of request statistics.

pub mod config;
pub mod document;
pub mod error;
mod index;
pub mod lexical;
pub mod predicate;
pub mod query;
pub mod request_queue;
pub mod search;
pub mod tokenizer;

pub use config::{RequestQueueConfig, SearchConfig};
pub use document::{DocId, Document, DocumentStatus, Rating};
pub use error::{Error, Result};
pub use predicate::DocumentPredicate;
pub use query::Query;
pub use request_queue::RequestQueue;
pub use search::SearchServer;
