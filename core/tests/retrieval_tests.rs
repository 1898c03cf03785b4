use retrieval::{BooleanRetrieval, InvertedIndex, QueryError, Token};

fn animals() -> InvertedIndex {
    let mut index = InvertedIndex::new();
    index.add_document("d1", "cat dog");
    index.add_document("d2", "dog bird");
    index.add_document("d3", "cat bird");
    index
}

#[test]
fn end_to_end_scenario() {
    let index = animals();
    assert_eq!(index.internal_id("d1"), Some(0));
    assert_eq!(index.internal_id("d2"), Some(1));
    assert_eq!(index.internal_id("d3"), Some(2));
    assert_eq!(index.postings("dog"), &[0, 1]);

    let br = BooleanRetrieval::new(&index);
    assert_eq!(br.retrieve_raw("cat dog AND"), vec![0]);
    assert_eq!(br.retrieve("cat dog AND"), vec!["d1"]);
    assert_eq!(br.retrieve_raw("cat dog OR"), vec![0, 1, 2]);
    assert_eq!(br.retrieve_raw("cat bird OR dog NOT"), vec![2]);
    assert_eq!(br.retrieve("cat bird OR dog NOT"), vec!["d3"]);
}

#[test]
fn bijection_survives_every_lookup() {
    let index = animals();
    for ext in ["d1", "d2", "d3"] {
        let id = index.internal_id(ext).unwrap();
        assert_eq!(index.original_doc_id(id), Some(ext));
    }
    assert_eq!(index.internal_id("d4"), None);
    assert_eq!(index.original_doc_id(3), None);
}

#[test]
fn statistics_follow_postings() {
    let index = animals();
    assert_eq!(index.vocabulary_size(), 3);
    assert_eq!(index.collection_size(), 3);
    assert_eq!(index.document_frequency("bird"), 2);
    assert_eq!(index.document_frequency("fish"), 0);
    let stats = index.term_statistics();
    assert_eq!(stats.get("cat"), Some(&2));
    let mut terms = index.all_terms();
    terms.sort_unstable();
    assert_eq!(terms, vec!["bird", "cat", "dog"]);
    assert_eq!(index.postings_with_original_ids("bird"), vec!["d2", "d3"]);
}

#[test]
fn strict_entry_point_distinguishes_malformed_from_empty() {
    let index = animals();
    let br = BooleanRetrieval::new(&index);
    assert_eq!(br.try_retrieve("cat fish AND"), Ok(vec![]));
    assert_eq!(
        br.try_retrieve("cat AND"),
        Err(QueryError::InsufficientOperands { operator: Token::And, found: 1 })
    );
    assert!(br.retrieve("cat AND").is_empty());
}

#[test]
fn frozen_index_serves_queries_from_many_threads() {
    let frozen = animals().freeze();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let index = frozen.clone();
            std::thread::spawn(move || BooleanRetrieval::new(&index).retrieve("bird cat NOT"))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), vec!["d2"]);
    }
}
