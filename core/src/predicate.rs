//! Document eligibility filters for ranking.
//!
//! Any `Fn(DocId, DocumentStatus, Rating) -> bool` closure is a predicate,
//! and so is a bare [`DocumentStatus`], which accepts exactly that status.

use crate::document::{DocId, DocumentStatus, Rating};

pub trait DocumentPredicate {
    fn accepts(&self, id: DocId, status: DocumentStatus, rating: Rating) -> bool;
}

impl<F> DocumentPredicate for F
where
    F: Fn(DocId, DocumentStatus, Rating) -> bool,
{
    fn accepts(&self, id: DocId, status: DocumentStatus, rating: Rating) -> bool {
        self(id, status, rating)
    }
}

impl DocumentPredicate for DocumentStatus {
    fn accepts(&self, _id: DocId, status: DocumentStatus, _rating: Rating) -> bool {
        *self == status
    }
}

/// Accepts documents with the given status.
pub fn with_status(wanted: DocumentStatus) -> impl Fn(DocId, DocumentStatus, Rating) -> bool + Copy {
    move |_, status, _| status == wanted
}

/// Accepts documents with status [`DocumentStatus::Actual`].
pub fn actual() -> impl Fn(DocId, DocumentStatus, Rating) -> bool + Copy {
    with_status(DocumentStatus::Actual)
}

/// Accepts everything.
pub fn any() -> impl Fn(DocId, DocumentStatus, Rating) -> bool + Copy {
    |_, _, _| true
}
