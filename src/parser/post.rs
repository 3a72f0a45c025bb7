//! Turns one chunk into a [`Post`].

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::PostError;
use crate::model::post::{content_hash_id, Post, DEFAULT_SENDER, DEFAULT_SUBJECT};
use crate::parser::chunk::Chunk;
use crate::parser::header::parse_headers;

/// Parse a chunk's header and body into an unflagged post.
///
/// A missing `Message-ID` falls back to the delimiter suffix; a missing or
/// unparseable date is an error.
pub fn parse_post(chunk: &Chunk) -> Result<Post, PostError> {
    let headers = parse_headers(&chunk.header)?;

    let identity = match headers.message_id.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            warn!(
                line = chunk.line,
                from = %chunk.from,
                "Missing message-id, using delimiter"
            );
            chunk.delimiter_id().to_string()
        }
    };

    let date = headers.date.ok_or(PostError::MissingDate)?;

    let mut body = String::with_capacity(chunk.body.iter().map(|l| l.len() + 1).sum());
    for line in &chunk.body {
        body.push_str(line);
        body.push('\n');
    }
    let line_count = chunk.body.len();

    if let Some(declared) = headers.lines {
        if declared != line_count {
            debug!(
                line = chunk.line,
                declared,
                actual = line_count,
                "Lines header does not match body"
            );
        }
    }

    Ok(Post {
        hash_id: content_hash_id(&identity),
        identity,
        date,
        sender: headers
            .from
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER.to_string()),
        subject: headers
            .subject
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        line_number: chunk.line,
        body,
        line_count,
        declared_lines: headers.lines,
        spam: false,
        removed: false,
        synthetic: false,
        references: headers.references.into_iter().collect::<BTreeSet<_>>(),
        referenced_by: BTreeSet::new(),
        unrecognized: headers.unrecognized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(header: &[&str], body: &[&str]) -> Chunk {
        Chunk {
            line: 10,
            from: "From -42".to_string(),
            header: header.iter().map(|s| s.to_string()).collect(),
            body: body.iter().map(|s| s.to_string()).collect(),
            span: header.len() + body.len() + 2,
        }
    }

    #[test]
    fn test_parse_full_post() {
        let post = parse_post(&chunk(
            &[
                "From: GM <gm@example.com>",
                "Subject: Turn 3",
                "Date: 02 Aug 2003 00:26:31 +0200",
                "Message-ID: <t3@example.com>",
                "References: <t1@example.com> <t2@example.com>",
                "Lines: 5",
                "Organization: Somewhere",
            ],
            &["Orders are due.", "", "-- GM"],
        ))
        .unwrap();

        assert_eq!(post.identity, "t3@example.com");
        assert_eq!(post.hash_id, content_hash_id("t3@example.com"));
        assert_eq!(post.sender, "GM <gm@example.com>");
        assert_eq!(post.subject, "Turn 3");
        assert_eq!(post.date.to_rfc3339(), "2003-08-01T22:26:31+00:00");
        assert_eq!(post.body, "Orders are due.\n\n-- GM\n");
        assert_eq!(post.line_count, 3);
        assert_eq!(post.declared_lines, Some(5));
        assert_eq!(post.line_number, 10);
        assert_eq!(post.references.len(), 2);
        assert!(post.references.contains("t1@example.com"));
        assert_eq!(post.unrecognized["organization"], vec!["Somewhere"]);
        assert!(!post.synthetic && !post.is_flagged());
    }

    #[test]
    fn test_missing_message_id_uses_delimiter() {
        let post = parse_post(&chunk(&["Date: 2000/11/28"], &["x"])).unwrap();
        assert_eq!(post.identity, "-42");
    }

    #[test]
    fn test_defaults_for_sender_and_subject() {
        let post = parse_post(&chunk(&["Date: 2000/11/28", "Subject: "], &[])).unwrap();
        assert_eq!(post.sender, DEFAULT_SENDER);
        assert_eq!(post.subject, DEFAULT_SUBJECT);
        assert_eq!(post.body, "");
    }

    #[test]
    fn test_missing_date_fails() {
        let err = parse_post(&chunk(&["Message-ID: <a@b>"], &[])).unwrap_err();
        assert_eq!(err, PostError::MissingDate);
    }

    #[test]
    fn test_invalid_message_id_fails() {
        let err = parse_post(&chunk(&["Date: 2000/11/28", "Message-ID: a@b"], &[])).unwrap_err();
        assert_eq!(err, PostError::InvalidMessageId("a@b".to_string()));
    }
}
