use crate::index::InvertedIndex;
use crate::merge::intersect;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub term: String,
    pub document_frequency: usize,
    pub postings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarPair {
    pub first: TermEntry,
    pub second: TermEntry,
    pub common: Vec<String>,
}

/// Document-frequency summary of a collection.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub collection_size: usize,
    pub vocabulary_size: usize,
    pub highest: Vec<TermEntry>,
    pub lowest: Vec<TermEntry>,
    pub similar: Option<SimilarPair>,
}

impl CollectionReport {
    /// Rank terms by document frequency (descending, ties by term) and take
    /// `top_n` from each end. The similar-frequency pair is the two adjacent
    /// terms at the middle of the ranking, reported only when the vocabulary
    /// holds at least `2 * top_n` terms.
    pub fn build(index: &InvertedIndex, top_n: usize) -> Self {
        let mut ranked: Vec<(&str, usize)> = index.term_statistics().into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let entry = |&(term, df): &(&str, usize)| TermEntry {
            term: term.to_string(),
            document_frequency: df,
            postings: index
                .postings_with_original_ids(term)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let highest = ranked.iter().take(top_n).map(entry).collect();
        let lowest = ranked[ranked.len().saturating_sub(top_n)..].iter().map(entry).collect();

        let similar = if ranked.len() >= (2 * top_n).max(2) {
            let mid = ranked.len() / 2;
            let (a, b) = (ranked[mid - 1], ranked[mid]);
            let common = intersect(index.postings(a.0), index.postings(b.0))
                .into_iter()
                .filter_map(|id| index.original_doc_id(id).map(str::to_string))
                .collect();
            Some(SimilarPair { first: entry(&a), second: entry(&b), common })
        } else {
            None
        };

        CollectionReport {
            collection_size: index.collection_size(),
            vocabulary_size: index.vocabulary_size(),
            highest,
            lowest,
            similar,
        }
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "Documents: {}", self.collection_size);
        let _ = writeln!(out, "Vocabulary: {}\n", self.vocabulary_size);

        for (title, entries) in [
            ("HIGHEST DOCUMENT FREQUENCY", &self.highest),
            ("LOWEST DOCUMENT FREQUENCY", &self.lowest),
        ] {
            let _ = writeln!(out, "{rule}\n{title}\n{rule}\n");
            for e in entries {
                render_entry(&mut out, e);
            }
        }

        if let Some(pair) = &self.similar {
            let _ = writeln!(out, "{rule}\nSIMILAR DOCUMENT FREQUENCY\n{rule}\n");
            render_entry(&mut out, &pair.first);
            render_entry(&mut out, &pair.second);
            let _ = writeln!(out, "Common documents ({}): {:?}", pair.common.len(), pair.common);
        }
        out
    }
}

fn render_entry(out: &mut String, e: &TermEntry) {
    let _ = writeln!(out, "Term: '{}'", e.term);
    let _ = writeln!(out, "Document Frequency: {}", e.document_frequency);
    let _ = writeln!(out, "Postings: {:?}\n", e.postings);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add_document("d1", "the cat sat");
        index.add_document("d2", "the dog sat");
        index.add_document("d3", "the cat ran");
        index
    }

    #[test]
    fn ranks_by_frequency_then_term() {
        let report = CollectionReport::build(&index(), 2);
        let top: Vec<_> = report
            .highest
            .iter()
            .map(|e| (e.term.as_str(), e.document_frequency))
            .collect();
        assert_eq!(top, vec![("the", 3), ("cat", 2)]);
        let bottom: Vec<_> = report.lowest.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(bottom, vec!["dog", "ran"]);
        assert_eq!(report.highest[1].postings, vec!["d1", "d3"]);
    }

    #[test]
    fn similar_pair_comes_from_the_middle() {
        // ranking: the(3) cat(2) sat(2) dog(1) ran(1)
        let report = CollectionReport::build(&index(), 2);
        let pair = report.similar.expect("five terms is enough for top 2");
        assert_eq!(pair.first.term, "cat");
        assert_eq!(pair.second.term, "sat");
        assert_eq!(pair.common, vec!["d1"]);
    }

    #[test]
    fn small_vocabulary_has_no_pair() {
        let report = CollectionReport::build(&index(), 10);
        assert!(report.similar.is_none());
        assert_eq!(report.highest.len(), 5);
        assert!(report.render().contains("Term: 'the'\nDocument Frequency: 3"));
    }
}
