use crate::tokenizer::tokenize;
use crate::DocId;
use std::collections::{BTreeSet, HashMap};
use std::ops::Deref;
use std::sync::Arc;

/// Term → postings storage plus the external/internal document ID bijection.
///
/// Postings are kept strictly ascending and duplicate-free at all times, so
/// readers can hand them to the merge routines without sorting.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    pub(crate) postings: HashMap<String, Vec<DocId>>,
    /// internal_id -> external id; its length is the next internal id
    pub(crate) doc_ids: Vec<String>,
    pub(crate) reverse_doc_ids: HashMap<String, DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index `text` under `external_id`, returning the document's internal id.
    ///
    /// An unseen external id gets the next internal id. A known one keeps its id
    /// and the new text's terms are unioned into its existing memberships.
    ///
    /// # Panics
    ///
    /// Panics if a new document would need an id beyond `DocId::MAX`.
    pub fn add_document(&mut self, external_id: &str, text: &str) -> DocId {
        let doc_id = self.resolve_internal_id(external_id);
        let terms: BTreeSet<String> = tokenize(text).into_iter().collect();
        for term in terms {
            insert_posting(self.postings.entry(term).or_default(), doc_id);
        }
        doc_id
    }

    fn resolve_internal_id(&mut self, external_id: &str) -> DocId {
        if let Some(&id) = self.reverse_doc_ids.get(external_id) {
            return id;
        }
        let id = checked_doc_id(self.doc_ids.len()).expect("collection exceeds the DocId range");
        self.doc_ids.push(external_id.to_string());
        self.reverse_doc_ids.insert(external_id.to_string(), id);
        id
    }

    /// Postings for `term`, or an empty slice when the term is unknown.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Postings for `term` mapped to external ids, in ascending internal-id order.
    pub fn postings_with_original_ids(&self, term: &str) -> Vec<&str> {
        self.postings(term)
            .iter()
            .filter_map(|&id| self.original_doc_id(id))
            .collect()
    }

    pub fn collection_size(&self) -> usize { self.doc_ids.len() }

    pub fn original_doc_id(&self, internal_id: DocId) -> Option<&str> {
        self.doc_ids.get(internal_id as usize).map(String::as_str)
    }

    pub fn internal_id(&self, external_id: &str) -> Option<DocId> {
        self.reverse_doc_ids.get(external_id).copied()
    }

    pub fn document_frequency(&self, term: &str) -> usize { self.postings(term).len() }

    pub fn vocabulary_size(&self) -> usize { self.postings.len() }

    pub fn all_terms(&self) -> Vec<&str> {
        self.postings.keys().map(String::as_str).collect()
    }

    /// Document frequency of every term in the vocabulary.
    pub fn term_statistics(&self) -> HashMap<&str, usize> {
        self.postings
            .iter()
            .map(|(term, plist)| (term.as_str(), plist.len()))
            .collect()
    }

    /// End the build phase. The returned handle is read-only and cheap to clone
    /// across threads.
    pub fn freeze(self) -> FrozenIndex {
        tracing::info!(
            num_docs = self.collection_size(),
            num_terms = self.vocabulary_size(),
            "index frozen"
        );
        FrozenIndex(Arc::new(self))
    }
}

/// The internal id for position `n`, if it fits in a `DocId`.
pub(crate) fn checked_doc_id(n: usize) -> Option<DocId> {
    DocId::try_from(n).ok()
}

// Appending is the common case since new documents carry the largest id so far;
// re-inserted documents fall back to an ordered insert.
fn insert_posting(plist: &mut Vec<DocId>, doc_id: DocId) {
    match plist.last() {
        Some(&last) if last == doc_id => {}
        Some(&last) if last > doc_id => {
            if let Err(pos) = plist.binary_search(&doc_id) {
                plist.insert(pos, doc_id);
            }
        }
        _ => plist.push(doc_id),
    }
}

/// Immutable, shareable view of a finished index.
#[derive(Debug, Clone)]
pub struct FrozenIndex(Arc<InvertedIndex>);

impl Deref for FrozenIndex {
    type Target = InvertedIndex;

    fn deref(&self) -> &InvertedIndex { &self.0 }
}
