//! Boilerplate and layout-artifact removal for extracted document text

use regex::{Regex, RegexBuilder};

/// Text normalizer removing extraction artifacts
///
/// Normalization is idempotent: running it over already-normalized text
/// is a no-op.
pub struct Normalizer {
    boilerplate: Vec<Regex>,
    page_marker: Regex,
    bare_number_line: Regex,
    hyphen_break: Regex,
    spaces: Regex,
}

impl Normalizer {
    /// Create a normalizer with a list of boilerplate phrases to strip
    pub fn new(boilerplate_phrases: &[String]) -> Self {
        let boilerplate = boilerplate_phrases
            .iter()
            .filter_map(|phrase| {
                RegexBuilder::new(&regex::escape(phrase))
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .collect();
        Self {
            boilerplate,
            page_marker: Regex::new(r"(?i)\bpage\s+\d+\b").expect("Invalid regex"),
            bare_number_line: Regex::new(r"(?m)^[ \t]*\d+[ \t]*$").expect("Invalid regex"),
            hyphen_break: Regex::new(r"(\w)-\n(\w)").expect("Invalid regex"),
            spaces: Regex::new(r"[ \t]{2,}").expect("Invalid regex"),
        }
    }

    /// Normalize extracted text into paragraph-level prose
    ///
    /// Applies, in order: boilerplate phrase removal, page-marker removal,
    /// bare-number-line removal, hyphenated line-break merging,
    /// intra-paragraph newline collapsing, and paragraph-break collapsing.
    /// Paragraphs in the output are separated by exactly one blank line.
    pub fn normalize(&self, text: &str) -> String {
        // Phrase removal runs first: stripping a phrase can expose a page
        // marker or leave a digit-only residue, and both must still be
        // removed in the same pass for normalization to stay idempotent.
        let mut t = text.to_string();
        for phrase in &self.boilerplate {
            t = phrase.replace_all(&t, "").into_owned();
        }

        t = self.page_marker.replace_all(&t, "").into_owned();
        t = self.bare_number_line.replace_all(&t, "").into_owned();

        t = self.hyphen_break.replace_all(&t, "${1}${2}").into_owned();

        // A single newline continues the paragraph; a blank line ends it.
        let paragraphs: Vec<String> = t
            .split("\n\n")
            .flat_map(|block| block.split("\r\n\r\n"))
            .map(|block| {
                block
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|paragraph| !paragraph.is_empty())
            .collect();

        let t = paragraphs.join("\n\n");
        self.spaces.replace_all(&t, " ").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(&["Disclaimer".to_string(), "Confidential".to_string()])
    }

    #[test]
    fn removes_page_markers() {
        let n = normalizer();
        let out = n.normalize("Intro text.\nPage 3\nMore text.");
        assert!(!out.contains("Page 3"));
        assert!(out.contains("Intro text."));
        assert!(out.contains("More text."));
    }

    #[test]
    fn removes_bare_number_lines() {
        let n = normalizer();
        let out = n.normalize("First paragraph.\n\n42\n\nSecond paragraph.");
        assert_eq!(out, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn strips_boilerplate_case_insensitively() {
        let n = normalizer();
        let out = n.normalize("CONFIDENTIAL material here.\n\ndisclaimer applies.");
        assert!(!out.to_lowercase().contains("confidential"));
        assert!(!out.to_lowercase().contains("disclaimer"));
        assert!(out.contains("material here."));
    }

    #[test]
    fn merges_hyphenated_line_breaks() {
        let n = normalizer();
        assert_eq!(n.normalize("an exam-\nple split"), "an example split");
    }

    #[test]
    fn collapses_single_newlines_into_spaces() {
        let n = normalizer();
        assert_eq!(
            n.normalize("line one\nline two\nline three"),
            "line one line two line three"
        );
    }

    #[test]
    fn collapses_newline_runs_into_one_paragraph_break() {
        let n = normalizer();
        assert_eq!(n.normalize("para one.\n\n\n\npara two."), "para one.\n\npara two.");
    }

    #[test]
    fn digit_residue_of_a_stripped_phrase_is_removed_in_one_pass() {
        let n = normalizer();
        let once = n.normalize("Confidential42\n\nbody text");
        assert_eq!(once, "body text");
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn page_marker_exposed_by_phrase_removal_is_removed_in_one_pass() {
        let n = normalizer();
        let once = n.normalize("intro. Confidentialpage 7\n\nbody text");
        assert_eq!(once, "intro.\n\nbody text");
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn idempotent() {
        let n = normalizer();
        let messy = "Page 1\nThe quick-\nbrown fox\njumps.\n\n\nConfidential\n\nOver the lazy dog.\n";
        let once = n.normalize(messy);
        let twice = n.normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let n = normalizer();
        assert_eq!(n.normalize("  \n hello world \n "), "hello world");
    }
}
