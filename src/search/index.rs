//! Inverted word index: term → archive positions.

use std::collections::{BTreeSet, HashMap};

/// Postings sets keyed by stemmed term.
///
/// Each set holds archive positions, so a post appears at most once per term.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<usize>>,
}

impl InvertedIndex {
    /// Record that the post at `position` contains `term`.
    pub fn insert(&mut self, term: &str, position: usize) {
        match self.postings.get_mut(term) {
            Some(set) => {
                set.insert(position);
            }
            None => {
                self.postings
                    .insert(term.to_string(), BTreeSet::from([position]));
            }
        }
    }

    /// Positions of the posts containing `term`.
    pub fn postings(&self, term: &str) -> Option<&BTreeSet<usize>> {
        self.postings.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedupes_per_post() {
        let mut index = InvertedIndex::default();
        index.insert("armi", 3);
        index.insert("armi", 3);
        index.insert("armi", 1);
        assert_eq!(
            index.postings("armi").unwrap().iter().copied().collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(index.len(), 1);
        assert!(index.postings("navi").is_none());
    }
}
