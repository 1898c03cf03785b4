//! Extraction of documents from TREC-style SGML (`<DOC>`, `<DOCNO>`, `<TEXT>`).

use crate::index::InvertedIndex;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DOC: Regex = Regex::new(r"(?s)<DOC>(.*?)</DOC>").expect("valid regex");
    static ref DOCNO: Regex = Regex::new(r"(?s)<DOCNO>\s*(.*?)\s*</DOCNO>").expect("valid regex");
    static ref TEXT: Regex = Regex::new(r"(?s)<TEXT>(.*?)</TEXT>").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrecDocument {
    pub docno: String,
    pub text: String,
}

/// Parse every `<DOC>` block in `content`.
///
/// Blocks without a non-empty DOCNO are skipped. A block with no TEXT is kept
/// with empty text so it still counts towards the collection.
pub fn parse_trec(content: &str) -> Vec<TrecDocument> {
    let mut docs = Vec::new();
    for block in DOC.captures_iter(content) {
        let body = &block[1];
        let docno = match DOCNO.captures(body) {
            Some(caps) if !caps[1].trim().is_empty() => caps[1].trim().to_string(),
            _ => {
                tracing::debug!("skipping DOC without DOCNO");
                continue;
            }
        };
        let text = TEXT
            .captures_iter(body)
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        docs.push(TrecDocument { docno, text });
    }
    docs
}

/// Parse `content` and add each document to `index`. Returns the number ingested.
pub fn ingest_trec(index: &mut InvertedIndex, content: &str) -> usize {
    let docs = parse_trec(content);
    for doc in &docs {
        index.add_document(&doc.docno, &doc.text);
    }
    docs.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<root>
<DOC>
<DOCNO> AP890101-0001 </DOCNO>
<TEXT>
the soviet union said
</TEXT>
<TEXT>
more text
</TEXT>
</DOC>
<DOC>
<DOCNO>  </DOCNO>
<TEXT>orphan</TEXT>
</DOC>
<DOC>
<DOCNO>AP890101-0002</DOCNO>
</DOC>
</root>";

    #[test]
    fn extracts_docno_and_joins_text_blocks() {
        let docs = parse_trec(SAMPLE);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].docno, "AP890101-0001");
        assert_eq!(
            docs[0].text.split_whitespace().collect::<Vec<_>>(),
            vec!["the", "soviet", "union", "said", "more", "text"]
        );
        assert_eq!(docs[1], TrecDocument { docno: "AP890101-0002".into(), text: String::new() });
    }

    #[test]
    fn ingest_registers_documents_without_text() {
        let mut index = InvertedIndex::new();
        assert_eq!(ingest_trec(&mut index, SAMPLE), 2);
        assert_eq!(index.collection_size(), 2);
        assert_eq!(index.postings("soviet"), &[0]);
        assert_eq!(index.internal_id("AP890101-0002"), Some(1));
        assert!(index.postings("orphan").is_empty());
    }
}
