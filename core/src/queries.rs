//! Batch query files and result listings.

/// Extract one RPN query per line.
///
/// Blank lines and `#` comments are ignored. A line may carry a label before
/// the query, either `label → query` or `1) query`.
pub fn parse_query_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            if let Some((_, query)) = line.split_once('→') {
                query
            } else if let Some((_, query)) = line.split_once(')') {
                query
            } else {
                line
            }
        })
        .map(|query| query.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|query| !query.is_empty())
        .collect()
}

/// One line per query with its external ids separated by spaces.
pub fn format_results<S: AsRef<str>>(results: &[Vec<S>]) -> String {
    let mut out = String::new();
    for hits in results {
        let line: Vec<&str> = hits.iter().map(|h| h.as_ref()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_labels_and_comments() {
        let content = "# boolean queries\n\n1) iran israel AND\n\
                       (2) → southwest   airlines OR africa NOT\nwinner\n3)   \n";
        assert_eq!(
            parse_query_file(content),
            vec!["iran israel AND", "southwest airlines OR africa NOT", "winner"]
        );
    }

    #[test]
    fn empty_results_produce_empty_lines() {
        let results = vec![vec!["AP1", "AP2"], vec![], vec!["AP9"]];
        assert_eq!(format_results(&results), "AP1 AP2\n\nAP9\n");
    }
}
