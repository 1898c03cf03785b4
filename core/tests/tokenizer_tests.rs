use retrieval::tokenizer::{clean_text, tokenize};

#[test]
fn it_strips_punctuation_without_folding_case() {
    let toks = tokenize("Cat's dog-house: \"bird\"");
    assert_eq!(toks, vec!["Cats", "doghouse", "bird"]);
}

#[test]
fn it_splits_on_any_whitespace() {
    let toks = tokenize("one\ttwo\n\nthree   four");
    assert_eq!(toks, vec!["one", "two", "three", "four"]);
}

#[test]
fn it_keeps_characters_outside_the_punctuation_class() {
    assert_eq!(clean_text("café 100% — ok"), "café 100 — ok");
}
