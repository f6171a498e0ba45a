//! Stop filter implementation.
//!
//! Removes common English words that carry little signal for credibility
//! classification. The list is the 179-word English list shipped with NLTK,
//! which is what the training corpus was historically cleaned with. Entries
//! containing an apostrophe can never match after
//! [`StripFilter`](super::strip::StripFilter) but are kept so the list stays
//! recognisable.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static ENGLISH_STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| DEFAULT_ENGLISH_STOP_WORDS.iter().copied().collect());

/// Removes English stop words from the token stream.
///
/// ```
/// use credence::analysis::token_filter::stop::StopFilter;
///
/// let filter = StopFilter::new();
/// assert!(filter.is_stop_word("the"));
/// assert!(!filter.is_stop_word("senate"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StopFilter;

impl StopFilter {
    pub fn new() -> Self {
        StopFilter
    }

    /// Check if a lowercase word is on the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        ENGLISH_STOP_WORDS.contains(word)
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.filter(|token| {
            token.is_stopped() || !ENGLISH_STOP_WORDS.contains(token.text.as_str())
        })))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
