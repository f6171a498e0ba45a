//! Text analysis for news articles.
//!
//! Char filters, a tokenizer and token filters compose into analyzers; the
//! one that matters to the rest of the crate is
//! [`TextNormalizer`](analyzer::normalizer::TextNormalizer).

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
