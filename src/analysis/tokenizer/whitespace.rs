//! Whitespace tokenizer implementation.

use super::Tokenizer;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Unicode `White_Space` plus the ASCII information separators
/// (U+001C..=U+001F), which newswire dumps use as field breaks.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// A tokenizer that splits text on runs of whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .split(is_separator)
            .filter(|word| !word.is_empty())
            .map(Token::new)
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        WhitespaceTokenizer::new()
            .tokenize(text)
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_whitespace_tokenizer() {
        assert_eq!(words("hello  world\ttest\n"), ["hello", "world", "test"]);
    }

    #[test]
    fn test_unicode_whitespace() {
        assert_eq!(words("caf\u{e9}\u{a0}cr\u{e8}me"), ["caf\u{e9}", "cr\u{e8}me"]);
    }

    #[test]
    fn test_information_separators_split() {
        assert_eq!(words("abc\u{1f}def\u{1c}ghi"), ["abc", "def", "ghi"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(words("").is_empty());
        assert!(words("  \n\t\u{1e} ").is_empty());
    }
}
