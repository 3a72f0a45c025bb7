//! Text normalization for the word index.

pub mod stopwords;
pub mod tokenize;

pub use tokenize::Tokenizer;
