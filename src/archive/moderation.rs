//! Runtime spam reports layered over the frozen archive.
//!
//! The archive itself never changes after ingestion. Reports are kept in a
//! separate hash-id keyed map behind a mutex, so concurrent readers can
//! report and query without coordinating with each other.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::model::post::Post;

/// Subject prefix shown for posts reported at runtime.
pub const SPAM_PREFIX: &str = "(spam) ";

/// Result of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The post was added to the overlay.
    Flagged,
    /// The post was removed from the overlay.
    Cleared,
    /// Nothing to do: already in the requested state.
    Unchanged,
    /// Reporting is switched off.
    Disabled,
}

#[derive(Debug, Default)]
pub struct ModerationOverlay {
    allow_reports: bool,
    /// hash id → identity
    flagged: Mutex<BTreeMap<String, String>>,
}

impl ModerationOverlay {
    pub fn new(allow_reports: bool) -> Self {
        Self {
            allow_reports,
            flagged: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn allow_reports(&self) -> bool {
        self.allow_reports
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        // Updates are single map operations, so a poisoned map is still consistent.
        self.flagged
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Flag (`spam = true`) or clear (`spam = false`) a post.
    ///
    /// Posts already flagged by the static tables and placeholders are left
    /// alone.
    pub fn report(&self, post: &Post, spam: bool) -> ReportOutcome {
        if !self.allow_reports {
            debug!(hash_id = %post.hash_id, "Spam reports are disabled");
            return ReportOutcome::Disabled;
        }
        if post.synthetic || post.is_flagged() {
            return ReportOutcome::Unchanged;
        }

        let mut flagged = self.lock();
        let outcome = if spam {
            if flagged.contains_key(&post.hash_id) {
                ReportOutcome::Unchanged
            } else {
                flagged.insert(post.hash_id.clone(), post.identity.clone());
                ReportOutcome::Flagged
            }
        } else if flagged.remove(&post.hash_id).is_some() {
            ReportOutcome::Cleared
        } else {
            ReportOutcome::Unchanged
        };

        if outcome != ReportOutcome::Unchanged {
            info!(identity = %post.identity, ?outcome, "Spam report");
        }
        outcome
    }

    pub fn is_flagged(&self, hash_id: &str) -> bool {
        self.lock().contains_key(hash_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `post` counts as spam, statically or by report.
    pub fn is_spam(&self, post: &Post) -> bool {
        post.spam || self.is_flagged(&post.hash_id)
    }

    /// The subject to show for `post`, marked when it has been reported.
    pub fn display_subject<'a>(&self, post: &'a Post) -> Cow<'a, str> {
        if self.is_flagged(&post.hash_id) && !post.subject.starts_with(SPAM_PREFIX) {
            Cow::Owned(format!("{SPAM_PREFIX}{}", post.subject))
        } else {
            Cow::Borrowed(&post.subject)
        }
    }

    /// The reported identities as lines ready to paste into the spam table.
    pub fn spam_table(&self) -> String {
        let flagged = self.lock();
        let mut identities: Vec<&String> = flagged.values().collect();
        identities.sort();

        let mut out = String::new();
        for identity in identities {
            out.push_str(&format!("{identity:?}: true,\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn post(identity: &str) -> Post {
        let mut post = Post::missing(identity, 1);
        post.synthetic = false;
        post.subject = "Buy now".to_string();
        post
    }

    #[test]
    fn test_disabled_overlay() {
        let overlay = ModerationOverlay::new(false);
        assert_eq!(overlay.report(&post("a@x"), true), ReportOutcome::Disabled);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_report_and_clear() {
        let overlay = ModerationOverlay::new(true);
        let p = post("a@x");

        assert_eq!(overlay.report(&p, true), ReportOutcome::Flagged);
        assert_eq!(overlay.report(&p, true), ReportOutcome::Unchanged);
        assert!(overlay.is_flagged(&p.hash_id));
        assert!(overlay.is_spam(&p));
        assert_eq!(overlay.display_subject(&p), "(spam) Buy now");

        assert_eq!(overlay.report(&p, false), ReportOutcome::Cleared);
        assert_eq!(overlay.report(&p, false), ReportOutcome::Unchanged);
        assert_eq!(overlay.display_subject(&p), "Buy now");
    }

    #[test]
    fn test_statically_flagged_and_placeholders_ignored() {
        let overlay = ModerationOverlay::new(true);
        let mut spam = post("s@x");
        spam.spam = true;
        assert_eq!(overlay.report(&spam, true), ReportOutcome::Unchanged);
        assert_eq!(
            overlay.report(&Post::missing("gone@x", 3), true),
            ReportOutcome::Unchanged
        );
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_spam_table_lines() {
        let overlay = ModerationOverlay::new(true);
        overlay.report(&post("b@x"), true);
        overlay.report(&post("a@x"), true);
        assert_eq!(overlay.spam_table(), "\"a@x\": true,\n\"b@x\": true,\n");
    }

    #[test]
    fn test_concurrent_reports() {
        let overlay = Arc::new(ModerationOverlay::new(true));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let overlay = Arc::clone(&overlay);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        overlay.report(&post(&format!("{i}-{j}@x")), true);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(overlay.len(), 400);
    }
}
