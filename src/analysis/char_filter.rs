//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the raw text before it is passed to the
//! tokenizer. They operate on the whole string, which makes them the right
//! place for rules anchored to the start of an article.
//!
//! # Available Filters
//!
//! - [`dateline::DatelineCharFilter`] - Strips a leading newswire dateline
//!
//! # Examples
//!
//! ```
//! use credence::analysis::char_filter::CharFilter;
//! use credence::analysis::char_filter::dateline::DatelineCharFilter;
//!
//! let filter = DatelineCharFilter::new().unwrap();
//! assert_eq!(filter.filter("WASHINGTON (Reuters) - Senate votes"), "Senate votes");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod dateline;

