use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PUNCTUATION: Regex =
        Regex::new(r##"[!"#$%&'()*+,\-./:;<=>?@\[\\\]^_`{|}~]"##).expect("valid regex");
}

/// Remove the fixed set of ASCII punctuation characters from `text`.
/// The collection is already lowercased upstream, so no case folding happens here.
pub fn clean_text(text: &str) -> String {
    PUNCTUATION.replace_all(text, "").into_owned()
}

/// Tokenize text into terms: strip punctuation, then split on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("the u.s. economy, (again)!");
        assert_eq!(t, vec!["the", "us", "economy", "again"]);
    }

    #[test]
    fn punctuation_only_tokens_vanish() {
        assert!(tokenize(" -- ... !! ").is_empty());
    }
}
