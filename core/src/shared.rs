use crate::index::InvertedIndex;
use crate::query::{BooleanRetrieval, QueryError};
use crate::DocId;
use parking_lot::RwLock;
use std::sync::Arc;

/// An index that accepts documents while serving queries.
///
/// Ingestion holds the write lock for a whole document, so a query never sees
/// a postings list mid-append. Prefer [`InvertedIndex::freeze`] when ingestion
/// and querying are separate phases.
#[derive(Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<InvertedIndex>>,
}

impl SharedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn add_document(&self, external_id: &str, text: &str) -> DocId {
        self.inner.write().add_document(external_id, text)
    }

    pub fn collection_size(&self) -> usize { self.inner.read().collection_size() }

    pub fn process_query(&self, query: &str) -> Result<Vec<DocId>, QueryError> {
        let guard = self.inner.read();
        BooleanRetrieval::new(&*guard).process_query(query)
    }

    pub fn retrieve(&self, query: &str) -> Vec<String> {
        let guard = self.inner.read();
        BooleanRetrieval::new(&*guard).retrieve(query)
    }

    /// Run `f` against a consistent snapshot of the index.
    pub fn with_read<R>(&self, f: impl FnOnce(&InvertedIndex) -> R) -> R {
        f(&self.inner.read())
    }
}

impl From<InvertedIndex> for SharedIndex {
    fn from(index: InvertedIndex) -> Self {
        Self { inner: Arc::new(RwLock::new(index)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn queries_run_alongside_ingestion() {
        let shared = SharedIndex::new();
        shared.add_document("seed", "common");

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    shared.add_document(&format!("doc-{i}"), "common extra");
                }
            })
        };
        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let hits = shared.process_query("common").unwrap();
                    assert!(hits.windows(2).all(|w| w[0] < w[1]));
                    assert_eq!(hits[0], 0);
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();

        assert_eq!(shared.collection_size(), 201);
        assert_eq!(shared.process_query("common extra NOT").unwrap(), vec![0]);
        assert_eq!(shared.with_read(|index| index.document_frequency("extra")), 200);
    }
}
