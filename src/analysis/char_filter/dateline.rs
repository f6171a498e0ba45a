//! Dateline char filter.
//!
//! Newswire copy usually opens with its origin, e.g.
//! `"WASHINGTON (Reuters) - The Senate voted ..."`. Left in place the source
//! name becomes a near-perfect label leak, so the prefix is cut before any
//! other analysis happens.
//!
//! The rule is narrow: from the start of the first line, the
//! shortest prefix ending in a parenthesized group of word characters and
//! whitespace, followed by optional whitespace, a hyphen or an em-dash, and
//! optional whitespace. Anything else passes through unchanged. Nested
//! parentheses, en-dashes and multi-line datelines do not match.

use regex::Regex;

use super::CharFilter;
use crate::error::{CredenceError, Result};

/// The dateline pattern. `.` does not cross a newline.
pub const DATELINE_PATTERN: &str = r"^.*?\([\w\s]+\)\s*[-\x{2014}]\s*";

/// A char filter that removes a leading "LOCATION (Source) - " prefix.
#[derive(Clone, Debug)]
pub struct DatelineCharFilter {
    pattern: Regex,
}

impl DatelineCharFilter {
    /// Create a new dateline char filter.
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(DATELINE_PATTERN)
            .map_err(|e| CredenceError::Anyhow(anyhow::Error::from(e)))?;
        Ok(Self { pattern })
    }
}

impl CharFilter for DatelineCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern.replace(input, "").into_owned()
    }

    fn name(&self) -> &'static str {
        "dateline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(input: &str) -> String {
        DatelineCharFilter::new().unwrap().filter(input)
    }

    #[test]
    fn test_strips_reuters_dateline() {
        assert_eq!(strip("NEW YORK (Reuters) - Stocks rose"), "Stocks rose");
    }

    #[test]
    fn test_strips_em_dash_dateline() {
        assert_eq!(strip("LONDON (AP) \u{2014} Markets fell"), "Markets fell");
    }

    #[test]
    fn test_bare_source_without_location() {
        assert_eq!(strip("(Reuters) -Officials said"), "Officials said");
    }

    #[test]
    fn test_no_dateline_passes_through() {
        let text = "Stocks rose on Tuesday - a record.";
        assert_eq!(strip(text), text);
    }

    #[test]
    fn test_only_first_line_is_considered() {
        let text = "Headline\nPARIS (AFP) - body";
        assert_eq!(strip(text), text);
    }

    #[test]
    fn test_en_dash_is_not_a_separator() {
        let text = "BERLIN (dpa) \u{2013} Ministers met";
        assert_eq!(strip(text), text);
    }

    #[test]
    fn test_only_first_dateline_removed() {
        assert_eq!(
            strip("ROME (Reuters) - Talks (in Rome) - continued"),
            "Talks (in Rome) - continued"
        );
    }
}
