//! Token filter implementations for token transformation.
//!
//! Filters receive a token stream and produce a new one, modifying or
//! removing tokens along the way.
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`strip::StripFilter`] - Removes every character that is not an ASCII letter
//! - [`remove_empty::RemoveEmptyFilter`] - Removes empty and stopped tokens
//! - [`stop::StopFilter`] - Removes stop words
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Lowercase → Strip → Remove Empty → Stop Words
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod remove_empty;
pub mod stop;
pub mod strip;
