//! Search engine: conjunctive term queries over the inverted index.

pub mod index;

use std::collections::BTreeSet;

use tracing::debug;

use crate::text::Tokenizer;

pub use self::index::InvertedIndex;

/// Evaluate `query` as the AND of its terms.
///
/// The query goes through the same tokenizer as the bodies. The first
/// term's postings seed the result and every further term narrows it. An
/// empty query, or one whose terms are all stop words, matches nothing.
/// Positions come back in archive order.
pub fn execute(index: &InvertedIndex, tokenizer: &Tokenizer, query: &str) -> Vec<usize> {
    let terms = tokenizer.query_terms(query);
    let mut terms = terms.iter();

    let Some(first) = terms.next() else {
        return Vec::new();
    };
    let mut result: BTreeSet<usize> = index.postings(first).cloned().unwrap_or_default();

    for term in terms {
        if result.is_empty() {
            break;
        }
        match index.postings(term) {
            Some(postings) => result.retain(|pos| postings.contains(pos)),
            None => result.clear(),
        }
    }

    debug!(query, hits = result.len(), "Search complete");
    result.into_iter().collect()
}
