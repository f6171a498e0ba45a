//! Token types for text analysis.
//!
//! A [`Token`] carries one whitespace-delimited word through the filter
//! chain. Filters rewrite its text or mark it stopped, and stopped tokens are
//! dropped by
//! [`RemoveEmptyFilter`](crate::analysis::token_filter::remove_empty::RemoveEmptyFilter).

use std::fmt;

/// A single word after tokenization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The current text of the word
    pub text: String,

    /// Whether a filter has marked this word for removal
    pub stopped: bool,
}

impl Token {
    /// Create a live token.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token {
            text: text.into(),
            stopped: false,
        }
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Replace the text, keeping the stopped flag.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A stream of tokens, as produced by tokenizers and consumed by filters.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_live() {
        let token = Token::new("senate");
        assert_eq!(token.text, "senate");
        assert!(!token.is_stopped());
    }

    #[test]
    fn test_with_text_keeps_stopped_flag() {
        let token = Token::new("2018").stop().with_text("");
        assert!(token.is_stopped());
        assert_eq!(token.to_string(), "");
    }
}
