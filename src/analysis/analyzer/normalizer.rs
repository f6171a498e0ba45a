//! The article text normalizer.
//!
//! Training and inference must see exactly the same transform: any drift
//! between the two silently degrades predictions. Both sides therefore build
//! their normalizer through [`TextNormalizer::new`] and never assemble the
//! pipeline by hand.
//!
//! The transform, in order:
//!
//! 1. strip a leading newswire dateline (`"CITY (Source) - "`)
//! 2. split on whitespace
//! 3. lowercase
//! 4. drop every character that is not an ASCII letter
//! 5. drop tokens left empty
//! 6. drop English stop words
//!
//! and [`TextNormalizer::normalize`] rejoins the survivors with single spaces.
//! Splitting before the character strip is equivalent to stripping first:
//! whitespace is never removed and no kept character is whitespace.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::dateline::DatelineCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::remove_empty::RemoveEmptyFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::token_filter::strip::StripFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Deterministic raw-text to normalized-text transform.
///
/// # Examples
///
/// ```
/// use credence::analysis::analyzer::normalizer::TextNormalizer;
///
/// let normalizer = TextNormalizer::new().unwrap();
/// assert_eq!(
///     normalizer.normalize("NEW YORK (Reuters) - Stocks rose").unwrap(),
///     "stocks rose"
/// );
/// assert_eq!(normalizer.normalize("1234!!??").unwrap(), "");
/// ```
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    inner: PipelineAnalyzer,
}

impl TextNormalizer {
    /// Build the normalizer.
    pub fn new() -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(DatelineCharFilter::new()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StripFilter::new()))
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .with_name("news_normalizer");

        Ok(TextNormalizer { inner: analyzer })
    }

    /// Normalize raw article text into space-joined tokens.
    ///
    /// An empty result is valid and means the text carried no usable words.
    pub fn normalize(&self, text: &str) -> Result<String> {
        let words: Vec<String> = self.inner.analyze(text)?.map(|token| token.text).collect();
        Ok(words.join(" "))
    }

    /// Normalize every text in a corpus, preserving order.
    pub fn normalize_all<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        texts
            .iter()
            .map(|text| self.normalize(text.as_ref()))
            .collect()
    }
}

impl Analyzer for TextNormalizer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "news_normalizer"
    }
}
