//! Body and query tokenization with English stemming.

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};

use crate::text::stopwords::stop_words;

/// Words shorter than this are not indexed.
pub const MIN_TERM_LEN: usize = 4;

/// Splits text into lower-cased, stemmed index terms.
pub struct Tokenizer {
    stemmer: Stemmer,
    stop_words: &'static HashSet<&'static str>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            stop_words: stop_words(),
        }
    }

    /// Every indexable term occurrence in `text`, in order.
    pub fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.words(text, MIN_TERM_LEN)
    }

    /// The distinct indexable terms of `text`, in order of first appearance.
    pub fn terms(&self, text: &str) -> Vec<String> {
        dedup(self.tokens(text))
    }

    /// The distinct terms of a search query.
    ///
    /// Query words are not length-filtered, so a short word can still match
    /// the stem of a longer indexed form ("fox" finds "foxes").
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        dedup(self.words(query, 1))
    }

    fn words<'a>(&'a self, text: &'a str, min_len: usize) -> impl Iterator<Item = String> + 'a {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .filter(move |word| {
                word.chars().all(char::is_alphabetic)
                    && word.chars().count() >= min_len
                    && !self.stop_words.contains(word.as_str())
            })
            .map(move |word| self.stemmer.stem(&word).into_owned())
    }
}

fn dedup(words: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words.filter(|word| seen.insert(word.clone())).collect()
}
