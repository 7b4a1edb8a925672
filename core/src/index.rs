use crate::document::{DocId, DocumentData};
use std::collections::{BTreeMap, HashMap};

/// Term frequencies of one term, keyed by document id.
pub type Postings = BTreeMap<DocId, f64>;

/// Document store and inverted index, always mutated together.
///
/// `insert` is infallible: callers validate ids and terms before handing
/// them over, so a rejected document never leaves partial postings behind.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Postings>,
    doc_terms: HashMap<DocId, BTreeMap<String, f64>>,
    docs: HashMap<DocId, DocumentData>,
    doc_order: Vec<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.docs.contains_key(&id)
    }

    /// Store a document whose terms are already validated and stop-word free.
    pub(crate) fn insert(&mut self, id: DocId, terms: &[&str], data: DocumentData) {
        debug_assert!(!self.contains(id));
        let freqs = self.doc_terms.entry(id).or_default();
        if !terms.is_empty() {
            let inv_term_count = 1.0 / terms.len() as f64;
            for &term in terms {
                *self.postings.entry(term.to_string()).or_default().entry(id).or_insert(0.0) += inv_term_count;
                *freqs.entry(term.to_string()).or_insert(0.0) += inv_term_count;
            }
        }
        self.docs.insert(id, data);
        self.doc_order.push(id);
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.postings.get(term)
    }

    pub fn document(&self, id: DocId) -> Option<&DocumentData> {
        self.docs.get(&id)
    }

    /// Term frequencies of one document; `None` if it is not stored.
    pub fn term_frequencies(&self, id: DocId) -> Option<&BTreeMap<String, f64>> {
        self.doc_terms.get(&id)
    }

    pub fn id_at(&self, position: usize) -> Option<DocId> {
        self.doc_order.get(position).copied()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.doc_order.iter().copied()
    }

    /// `ln(N / df)` for a term with at least one posting.
    pub fn inverse_document_freq(&self, postings: &Postings) -> f64 {
        debug_assert!(!postings.is_empty());
        (self.num_docs() as f64 / postings.len() as f64).ln()
    }
}
