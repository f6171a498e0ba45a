//! Strip filter implementation.

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A filter that removes every character that is not an ASCII letter.
///
/// Digits, punctuation, symbols and non-ASCII letters are all dropped, so
/// `"u.s."` becomes `"us"` and `"2018"` becomes empty. Tokens left empty are
/// marked as stopped.
#[derive(Clone, Debug, Default)]
pub struct StripFilter;

impl StripFilter {
    /// Create a new strip filter.
    pub fn new() -> Self {
        StripFilter
    }
}

impl Filter for StripFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let stripped: String = token
                        .text
                        .chars()
                        .filter(|c| c.is_ascii_alphabetic())
                        .collect();
                    if stripped.is_empty() {
                        token.with_text(stripped).stop()
                    } else {
                        token.with_text(stripped)
                    }
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "strip"
    }
}
