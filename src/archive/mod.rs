//! The in-memory archive: every post plus the lookup structures built over it.
//!
//! An [`Archive`] is produced once by [`builder::build`] and is read-only
//! afterwards, so shared references can be handed to any number of readers.
//! Posts live in a single `Vec`; every map stores positions into it, and
//! reply links are identity sets resolved at read time.

pub mod builder;
pub mod link;
pub mod moderation;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{ArchiveError, Result};
use crate::model::period::{PeriodBucket, Periods};
use crate::model::post::Post;
use crate::search::{self, InvertedIndex};
use crate::text::Tokenizer;

pub use self::builder::{build, build_from_path, IngestOptions, IngestReport};
pub use self::moderation::ModerationOverlay;

#[derive(Debug, Default)]
pub struct Archive {
    posts: Vec<Post>,
    by_identity: HashMap<String, usize>,
    by_hash: HashMap<String, usize>,
    by_line: HashMap<usize, usize>,
    periods: Periods,
    index: InvertedIndex,
    corpus: HashMap<String, usize>,
    header_keys: BTreeMap<String, usize>,
    tokenizer: Tokenizer,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Building ────────────────────────────────────────────────

    /// Register a real post under its identity, hash id and line number.
    ///
    /// Fails without modifying the archive if the identity is already taken.
    pub fn insert(&mut self, post: Post) -> Result<usize> {
        if self.by_identity.contains_key(&post.identity) {
            return Err(ArchiveError::DuplicateIdentity {
                identity: post.identity,
                line: post.line_number,
            });
        }

        let position = self.posts.len();
        self.by_identity.insert(post.identity.clone(), position);
        self.by_hash.insert(post.hash_id.clone(), position);
        self.by_line.insert(post.line_number, position);
        self.posts.push(post);
        Ok(position)
    }

    /// Register a placeholder under its identity only.
    pub(crate) fn insert_synthetic(&mut self, post: Post) -> usize {
        let position = self.posts.len();
        self.by_identity.insert(post.identity.clone(), position);
        self.posts.push(post);
        position
    }

    /// Add the post at `position` to its period buckets and, when
    /// `build_corpus` is set, to the word index and frequency counts.
    ///
    /// Flagged and synthetic posts are skipped. Returns whether the post was
    /// indexed.
    pub(crate) fn index_post(&mut self, position: usize, build_corpus: bool) -> bool {
        let Some(post) = self.posts.get(position) else {
            return false;
        };
        if !post.is_listed() {
            return false;
        }

        self.periods.insert(&post.date, position);

        if build_corpus {
            for token in self.tokenizer.tokens(&post.body) {
                *self.corpus.entry(token).or_insert(0) += 1;
            }
            for term in self.tokenizer.terms(&post.body) {
                self.index.insert(&term, position);
            }
        }
        true
    }

    /// Count the header keys of one chunk for the header census.
    pub(crate) fn record_header_key(&mut self, key: String) {
        *self.header_keys.entry(key).or_insert(0) += 1;
    }

    // ── Lookup ──────────────────────────────────────────────────

    /// All posts, synthetic placeholders included, in archive order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, position: usize) -> Option<&Post> {
        self.posts.get(position)
    }

    /// Total number of entries, synthetic placeholders included.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn position_of(&self, identity: &str) -> Option<usize> {
        self.by_identity.get(identity).copied()
    }

    pub fn get(&self, identity: &str) -> Option<&Post> {
        self.position_of(identity).map(|pos| &self.posts[pos])
    }

    pub fn by_hash_id(&self, hash_id: &str) -> Option<&Post> {
        self.by_hash.get(hash_id).map(|&pos| &self.posts[pos])
    }

    /// Look up the post whose delimiter sits on `line`.
    pub fn by_line(&self, line: usize) -> Option<&Post> {
        self.by_line.get(&line).map(|&pos| &self.posts[pos])
    }

    /// Resolve an external key: hash id first, then identity, then line number.
    pub fn lookup(&self, key: &str) -> Option<&Post> {
        let key = key.trim();
        if let Some(post) = self.by_hash_id(key).or_else(|| self.get(key)) {
            return Some(post);
        }
        let found = key.parse::<usize>().ok().and_then(|line| self.by_line(line));
        if found.is_none() {
            debug!(key, "Lookup found nothing");
        }
        found
    }

    /// Posts cited by `post`, placeholders included.
    pub fn references_of(&self, post: &Post) -> Vec<&Post> {
        post.references.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Real posts citing `post`.
    pub fn referenced_by_of(&self, post: &Post) -> Vec<&Post> {
        post.referenced_by
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    // ── Periods ─────────────────────────────────────────────────

    pub fn periods(&self) -> &Periods {
        &self.periods
    }

    /// Look up a bucket by `"YYYY"`, `"YYYY/MM"` or `"YYYY/MM/DD"`.
    pub fn period(&self, label: &str) -> Option<&PeriodBucket> {
        self.periods.get(label.trim_matches('/'))
    }

    /// The member posts of a bucket, in ingestion order.
    pub fn period_posts(&self, label: &str) -> Vec<&Post> {
        self.period(label)
            .map(|bucket| bucket.posts.iter().map(|&pos| &self.posts[pos]).collect())
            .unwrap_or_default()
    }

    /// Year label and post count, oldest first.
    pub fn years(&self) -> Vec<(String, usize)> {
        self.periods
            .years()
            .map(|bucket| (bucket.label.clone(), bucket.posts.len()))
            .collect()
    }

    /// Dates of the oldest and newest real posts.
    pub fn date_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut dates = self.real_posts().map(|post| post.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Number of real posts, flagged ones included.
    pub fn article_count(&self) -> usize {
        self.real_posts().count()
    }

    pub fn synthetic_count(&self) -> usize {
        self.posts.len() - self.article_count()
    }

    fn real_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|post| !post.synthetic)
    }

    // ── Words ───────────────────────────────────────────────────

    /// Posts containing every term of `query`, in archive order.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        search::execute(&self.index, &self.tokenizer, query)
            .into_iter()
            .map(|pos| &self.posts[pos])
            .collect()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Occurrence count of every indexed term.
    pub fn corpus(&self) -> &HashMap<String, usize> {
        &self.corpus
    }

    /// The `n` most frequent terms, ties broken alphabetically.
    pub fn top_words(&self, n: usize) -> Vec<(&str, usize)> {
        let mut words: Vec<(&str, usize)> = self
            .corpus
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(n);
        words
    }

    // ── Diagnostics ─────────────────────────────────────────────

    /// How often each case-folded header key appeared across all chunks.
    pub fn header_keys(&self) -> &BTreeMap<String, usize> {
        &self.header_keys
    }

    /// Unflagged real posts sent by one of `senders`.
    pub fn suspect_spam<S: AsRef<str>>(&self, senders: &[S]) -> Vec<&Post> {
        self.real_posts()
            .filter(|post| !post.is_flagged())
            .filter(|post| senders.iter().any(|s| s.as_ref() == post.sender))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::post::content_hash_id;
    use chrono::TimeZone;

    fn post(identity: &str, line: usize, body: &str) -> Post {
        let mut post = Post::missing(identity, line);
        post.synthetic = false;
        post.date = Utc.with_ymd_and_hms(1998, 5, 12, 8, 0, 0).unwrap();
        post.sender = "GM <gm@example.com>".to_string();
        post.subject = format!("post {identity}");
        post.body = body.to_string();
        post.line_count = body.lines().count();
        post
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut archive = Archive::new();
        archive.insert(post("a1@x", 1, "first")).unwrap();
        let err = archive.insert(post("a1@x", 9, "second")).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::DuplicateIdentity { ref identity, line: 9 } if identity == "a1@x"
        ));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.get("a1@x").unwrap().body, "first");
    }

    #[test]
    fn test_lookup_fallback_chain() {
        let mut archive = Archive::new();
        archive.insert(post("a1@x", 17, "")).unwrap();

        let by_hash = archive.lookup(&content_hash_id("a1@x")).unwrap();
        assert_eq!(by_hash.identity, "a1@x");
        assert_eq!(archive.lookup("a1@x").unwrap().identity, "a1@x");
        assert_eq!(archive.lookup("17").unwrap().identity, "a1@x");
        assert!(archive.lookup("18").is_none());
        assert!(archive.lookup("nope").is_none());
    }

    #[test]
    fn test_index_post_skips_flagged() {
        let mut archive = Archive::new();
        let a = archive.insert(post("a1@x", 1, "fleet movement")).unwrap();
        let mut spam = post("s1@x", 5, "fleet sale");
        spam.spam = true;
        let b = archive.insert(spam).unwrap();

        assert!(archive.index_post(a, true));
        assert!(!archive.index_post(b, true));

        assert_eq!(archive.search("fleet").len(), 1);
        assert_eq!(archive.period_posts("1998/05/12").len(), 1);
        assert_eq!(archive.corpus()["fleet"], 1);
        assert!(archive.by_hash_id(&content_hash_id("s1@x")).is_some());
    }

    #[test]
    fn test_index_post_without_corpus() {
        let mut archive = Archive::new();
        let a = archive.insert(post("a1@x", 1, "fleet movement")).unwrap();
        assert!(archive.index_post(a, false));
        assert!(archive.search("fleet").is_empty());
        assert!(archive.corpus().is_empty());
        assert_eq!(archive.years(), vec![("1998".to_string(), 1)]);
    }

    #[test]
    fn test_top_words_order() {
        let mut archive = Archive::new();
        let a = archive
            .insert(post("a1@x", 1, "army army fleet fleet navy"))
            .unwrap();
        archive.index_post(a, true);
        let top = archive.top_words(2);
        assert_eq!(top, vec![("armi", 2), ("fleet", 2)]);
    }

    #[test]
    fn test_suspect_spam() {
        let mut archive = Archive::new();
        let mut p = post("a1@x", 1, "");
        p.sender = "HGHFGDS <fhfgfgg@gmail.com>".to_string();
        archive.insert(p).unwrap();
        archive.insert(post("a2@x", 3, "")).unwrap();

        let suspects = archive.suspect_spam(&["HGHFGDS <fhfgfgg@gmail.com>"]);
        assert_eq!(suspects.len(), 1);
        assert_eq!(suspects[0].identity, "a1@x");
    }
}
