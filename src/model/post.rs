//! The archived posting.

use std::collections::{BTreeMap, BTreeSet};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Sender shown when a post has no `From:` header.
pub const DEFAULT_SENDER: &str = "(missing sender)";

/// Subject shown when a post has no `Subject:` header.
pub const DEFAULT_SUBJECT: &str = "(Missing Subject Line)";

pub const SPAM_SUBJECT: &str = "Message has been flagged as spam.";
pub const REMOVED_SUBJECT: &str = "Message has been taken down due to request.";
pub const REDACTED_BODY: &str = "Message content has been removed.";
pub const REDACTED_LINES: usize = 3;

pub const MISSING_SENDER: &str = "** unknown sender **";
pub const MISSING_SUBJECT: &str = "** missing post **";
pub const MISSING_BODY: &str =
    "This is not the original post.\nWe were unable to locate the original in the archive.\n";
pub const MISSING_LINES: usize = 5;

/// A single posting to the newsgroup.
///
/// Links to other posts are held as identity sets and resolved through the
/// [`Archive`](crate::archive::Archive) at read time.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Post {
    /// Unique id from the `Message-ID` header (or the delimiter line).
    pub identity: String,

    /// URL-safe hash of `identity`, used as the external key.
    pub hash_id: String,

    /// Posting time, normalized to UTC.
    pub date: DateTime<Utc>,

    pub sender: String,
    pub subject: String,

    /// 1-based archive line of the post's delimiter.
    pub line_number: usize,

    /// Body text, one `\n` after every line.
    pub body: String,

    /// Number of body lines.
    pub line_count: usize,

    /// `Lines:` as declared by the posting software. Often wrong.
    pub declared_lines: Option<usize>,

    pub spam: bool,
    pub removed: bool,

    /// A placeholder standing in for a cited post that is not in the archive.
    pub synthetic: bool,

    /// Identities this post cites.
    pub references: BTreeSet<String>,

    /// Identities of real posts citing this one.
    pub referenced_by: BTreeSet<String>,

    /// Headers we do not interpret, kept for diagnostics.
    pub unrecognized: BTreeMap<String, Vec<String>>,
}

impl Post {
    /// Build the placeholder for a cited identity missing from the archive.
    ///
    /// `line_number` is the line of the first post citing it.
    pub fn missing(identity: &str, line_number: usize) -> Self {
        Self {
            identity: identity.to_string(),
            hash_id: content_hash_id(identity),
            date: DateTime::UNIX_EPOCH,
            sender: MISSING_SENDER.to_string(),
            subject: MISSING_SUBJECT.to_string(),
            line_number,
            body: MISSING_BODY.to_string(),
            line_count: MISSING_LINES,
            declared_lines: None,
            spam: false,
            removed: false,
            synthetic: true,
            references: BTreeSet::new(),
            referenced_by: BTreeSet::new(),
            unrecognized: BTreeMap::new(),
        }
    }

    /// Spam or taken down.
    pub fn is_flagged(&self) -> bool {
        self.spam || self.removed
    }

    /// A real post with content that belongs in periods and the word index.
    pub fn is_listed(&self) -> bool {
        !self.synthetic && !self.is_flagged()
    }
}

/// Deterministic, fixed-width, URL-safe hash of an identity.
pub fn content_hash_id(identity: &str) -> String {
    let digest = Sha256::digest(identity.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
