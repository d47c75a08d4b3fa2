//! Splitting a report into hit sections.

use once_cell::sync::Lazy;
use regex::Regex;

/// `_|*| ... newSP ... |*|_` on a single line, matched lazily
static SECTION_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"_\|\*\|.*?newSP.*?\|\*\|_").expect("section delimiter pattern is valid")
});

/// Split file content into hit sections.
///
/// Whatever precedes the first delimiter is a preamble and never a section,
/// so content without delimiters yields no sections.
pub fn split_sections(content: &str) -> Vec<&str> {
    SECTION_DELIMITER.split(content).skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_is_dropped() {
        let content = "header line\n_|*|___ newSP 1 ___|*|_\nBlastx evalue: 1e-5\n_|*|_newSP_|*|_\nsecond\n";
        let sections = split_sections(content);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], "\nBlastx evalue: 1e-5\n");
        assert_eq!(sections[1], "\nsecond\n");
    }

    #[test]
    fn test_no_delimiters() {
        assert!(split_sections("Blastx evalue: 1e-5\nQuery name: Q1\n").is_empty());
        assert!(split_sections("").is_empty());
    }

    #[test]
    fn test_delimiter_is_non_greedy() {
        // two delimiters on one line must not merge into one
        let content = "_|*| newSP |*|_A_|*| newSP |*|_B";
        assert_eq!(split_sections(content), vec!["A", "B"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_section() {
        let sections = split_sections("pre_|*|newSP|*|_");
        assert_eq!(sections, vec![""]);
    }

    #[test]
    fn test_delimiter_does_not_span_lines() {
        let content = "_|*| new\nSP |*|_body";
        assert!(split_sections(content).is_empty());
    }
}
