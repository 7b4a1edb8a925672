//! TF-IDF search server: document ingestion, ranking and matching.

use crate::config::SearchConfig;
use crate::document::{compute_average_rating, DocId, Document, DocumentData, DocumentStatus, Rating};
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::lexical::is_valid_word;
use crate::predicate::DocumentPredicate;
use crate::query::{parse_query, Query};
use crate::tokenizer::{make_unique_non_empty_strings, split_into_words};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, trace};

/// In-memory document index ranked with TF-IDF.
///
/// Documents are append-only. Searching borrows the server immutably, so a
/// server can be shared by readers once all documents are in.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: BTreeSet<String>,
    index: InvertedIndex,
    config: SearchConfig,
}

impl SearchServer {
    /// Build a server from a collection of stop words.
    ///
    /// Empty strings and duplicates are dropped; a stop word with control
    /// characters fails with [`Error::InvalidStopWord`].
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, SearchConfig::default())
    }

    /// Build a server from space-separated stop words.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    pub fn with_config<I, S>(stop_words: I, config: SearchConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = make_unique_non_empty_strings(stop_words);
        if let Some(bad) = stop_words.iter().find(|w| !is_valid_word(w)) {
            return Err(Error::InvalidStopWord(bad.clone()));
        }
        Ok(SearchServer { stop_words, index: InvertedIndex::new(), config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &BTreeSet<String> {
        &self.stop_words
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn add_document(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[Rating]) -> Result<()> {
        if id < 0 {
            return Err(Error::NegativeId(id));
        }
        if self.index.contains(id) {
            return Err(Error::DuplicateId(id));
        }
        let terms = self.split_into_words_no_stop(text)?;
        let data = DocumentData { rating: compute_average_rating(ratings), status };
        debug!(id, terms = terms.len(), rating = data.rating, %status, "adding document");
        self.index.insert(id, &terms, data);
        Ok(())
    }

    fn split_into_words_no_stop<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(Error::InvalidTerm(word.to_string()));
            }
            if !self.is_stop_word(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    pub fn document_count(&self) -> usize {
        self.index.num_docs()
    }

    /// Id of the document added at position `index` (0-based, insertion order).
    pub fn document_id_at(&self, index: usize) -> Result<DocId> {
        self.index
            .id_at(index)
            .ok_or(Error::IndexOutOfRange { index, count: self.document_count() })
    }

    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.index.ids()
    }

    /// Term frequencies of a document. Unknown ids get an empty map.
    pub fn word_frequencies(&self, id: DocId) -> BTreeMap<String, f64> {
        self.index.term_frequencies(id).cloned().unwrap_or_default()
    }

    pub fn parse_query(&self, text: &str) -> Result<Query> {
        parse_query(text, |w| self.is_stop_word(w))
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_with_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, status)
    }

    /// Rank every document matching the query and accepted by `predicate`.
    ///
    /// At most `config.max_results` documents are returned, best first.
    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: DocumentPredicate,
    {
        let query = self.parse_query(raw_query)?;
        let mut matched = self.find_all_documents(&query, &predicate);
        sort_by_relevance(&mut matched, self.config.relevance_epsilon);
        let total_hits = matched.len();
        matched.truncate(self.config.max_results);
        debug!(query = raw_query, total_hits, returned = matched.len(), "ranked documents");
        Ok(matched)
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: &P) -> Vec<Document>
    where
        P: DocumentPredicate,
    {
        let mut document_to_relevance: HashMap<DocId, f64> = HashMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            let idf = self.index.inverse_document_freq(postings);
            trace!(word = word.as_str(), idf, df = postings.len(), "scoring term");
            for (&id, &tf) in postings {
                let Some(data) = self.index.document(id) else { continue };
                if predicate.accepts(id, data.status, data.rating) {
                    *document_to_relevance.entry(id).or_insert(0.0) += tf * idf;
                }
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            for id in postings.keys() {
                document_to_relevance.remove(id);
            }
        }

        document_to_relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.index.document(id).map(|data| Document::new(id, relevance, data.rating))
            })
            .collect()
    }

    /// Required terms the document contains, or none if it contains an excluded term.
    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        let status = self.index.document(id).ok_or(Error::DocumentNotFound(id))?.status;
        let query = self.parse_query(raw_query)?;
        let doc_terms = self.index.term_frequencies(id);
        let contains = |word: &String| doc_terms.is_some_and(|terms| terms.contains_key(word));

        if query.minus_words.iter().any(contains) {
            return Ok((Vec::new(), status));
        }
        let matched = query.plus_words.iter().filter(|w| contains(*w)).cloned().collect();
        Ok((matched, status))
    }
}

/// Descending relevance; relevances within `epsilon` of their neighbour form
/// one band, ordered by descending rating and then ascending id.
///
/// Banding keeps the comparison a total order even though "within epsilon"
/// is not transitive.
fn sort_by_relevance(docs: &mut [Document], epsilon: f64) {
    docs.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    let mut bands = Vec::with_capacity(docs.len());
    let mut band = 0usize;
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 && (docs[i - 1].relevance - doc.relevance).abs() >= epsilon {
            band += 1;
        }
        bands.push(band);
    }
    let mut keyed: Vec<(usize, Document)> = bands.into_iter().zip(docs.iter().copied()).collect();
    keyed.sort_by(|(band_a, a), (band_b, b)| {
        band_a.cmp(band_b).then(b.rating.cmp(&a.rating)).then(a.id.cmp(&b.id))
    });
    for (slot, (_, doc)) in docs.iter_mut().zip(keyed) {
        *slot = doc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate;

    fn server() -> SearchServer {
        let mut server = SearchServer::from_stop_words_text("and in on").unwrap();
        server.add_document(0, "white cat and fancy collar", DocumentStatus::Actual, &[8, -3]).unwrap();
        server.add_document(1, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
        server.add_document(2, "groomed dog expressive eyes", DocumentStatus::Actual, &[5, -12, 2, 1]).unwrap();
        server.add_document(3, "groomed starling eugene", DocumentStatus::Banned, &[9]).unwrap();
        server
    }

    #[test]
    fn stop_words_are_validated() {
        assert!(matches!(SearchServer::new(["ok", "b\u{1}ad"]), Err(Error::InvalidStopWord(w)) if w == "b\u{1}ad"));
        let server = SearchServer::new(["in", "", "in"]).unwrap();
        assert_eq!(server.stop_words().len(), 1);
    }

    #[test]
    fn stop_words_are_not_indexed() {
        let mut server = SearchServer::from_stop_words_text("in the").unwrap();
        server.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        assert!(server.find_top_documents("in").unwrap().is_empty());
        let found = server.find_top_documents("cat").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 42);
        assert_eq!(found[0].rating, 2);
    }

    #[test]
    fn rejects_bad_ids_and_terms() {
        let mut server = server();
        assert_eq!(server.add_document(-1, "cat", DocumentStatus::Actual, &[]), Err(Error::NegativeId(-1)));
        assert_eq!(server.add_document(1, "cat", DocumentStatus::Actual, &[]), Err(Error::DuplicateId(1)));
        assert!(matches!(
            server.add_document(9, "big do\u{12}g", DocumentStatus::Actual, &[]),
            Err(Error::InvalidTerm(_))
        ));
        assert_eq!(server.document_count(), 4);
        assert!(server.word_frequencies(9).is_empty());
        assert!(server.find_top_documents("big").unwrap().is_empty());
    }

    #[test]
    fn document_positions() {
        let server = server();
        assert_eq!(server.document_id_at(0).unwrap(), 0);
        assert_eq!(server.document_id_at(3).unwrap(), 3);
        assert_eq!(server.document_id_at(4), Err(Error::IndexOutOfRange { index: 4, count: 4 }));
        assert_eq!(server.document_ids().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn default_search_skips_other_statuses() {
        let server = server();
        let found = server.find_top_documents("groomed").unwrap();
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);
        let banned = server.find_top_documents_with_status("groomed", DocumentStatus::Banned).unwrap();
        assert_eq!(banned.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn predicate_filters_by_id() {
        let server = server();
        let found = server.find_top_documents_by("fluffy groomed cat", |id, _, _| id % 2 == 0).unwrap();
        // equal relevance (tf 1/4, idf ln 2), doc 0 has the higher rating
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn minus_words_exclude_regardless_of_predicate() {
        let server = server();
        let found = server.find_top_documents_by("cat -fluffy", predicate::any()).unwrap();
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![0]);
        let found = server.find_top_documents_by("cat -cat", predicate::any()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn only_minus_words_yield_nothing() {
        let server = server();
        assert!(server.find_top_documents("-dog").unwrap().is_empty());
        assert!(server.find_top_documents("").unwrap().is_empty());
    }

    #[test]
    fn malformed_queries_fail() {
        let server = server();
        for text in ["cat -", "cat --dog", "- dog", "ca\u{7}t"] {
            assert!(matches!(server.find_top_documents(text), Err(Error::InvalidQuery(_))), "{text:?}");
        }
    }

    #[test]
    fn match_document_lists_plus_words() {
        let server = server();
        let (words, status) = server.match_document("fluffy tail cat dog", 1).unwrap();
        assert_eq!(words, vec!["cat", "fluffy", "tail"]);
        assert_eq!(status, DocumentStatus::Actual);

        let (words, status) = server.match_document("groomed -eugene", 3).unwrap();
        assert!(words.is_empty());
        assert_eq!(status, DocumentStatus::Banned);

        assert_eq!(server.match_document("cat", 17), Err(Error::DocumentNotFound(17)));
        assert!(matches!(server.match_document("--cat", 1), Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn results_are_capped() {
        let mut server = SearchServer::with_config(
            Vec::<String>::new(),
            SearchConfig { max_results: 2, ..SearchConfig::default() },
        )
        .unwrap();
        for id in 0..6 {
            server.add_document(id, "same words here", DocumentStatus::Actual, &[id]).unwrap();
        }
        server.add_document(6, "other", DocumentStatus::Actual, &[]).unwrap();
        let found = server.find_top_documents("words").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![5, 4]);
    }

    #[test]
    fn banding_orders_close_relevances_by_rating() {
        let mut docs = vec![
            Document::new(0, 0.5, 1),
            Document::new(1, 0.5 + 1e-7, 3),
            Document::new(2, 0.9, -1),
            Document::new(3, 0.5 - 1e-7, 3),
            Document::new(4, 0.1, 10),
        ];
        sort_by_relevance(&mut docs, 1e-6);
        assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2, 1, 3, 0, 4]);
    }
}
