//! Header field parsing: key/value splitting, message-ids, and reference lists.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::PostError;
use crate::parser::date::parse_date;

/// Reference fragments shorter than this are debris from broken brackets.
pub const MIN_REFERENCE_LEN: usize = 4;

/// The header fields of one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers {
    /// `Message-ID` with the angle brackets removed.
    pub message_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub from: Option<String>,
    pub subject: Option<String>,
    /// `Lines:` as declared by the posting software.
    pub lines: Option<usize>,
    /// Cited message-ids, in order of first appearance.
    pub references: Vec<String>,
    /// Every other header, keyed by case-folded name.
    pub unrecognized: BTreeMap<String, Vec<String>>,
}

/// Parse the (already unfolded) header lines of a chunk.
///
/// When a recognized header repeats, the last value wins; `References`
/// values accumulate.
pub fn parse_headers(lines: &[String]) -> Result<Headers, PostError> {
    let mut headers = Headers::default();

    for line in lines {
        let (key, value) =
            split_header(line).ok_or_else(|| PostError::InvalidHeaderLine(line.clone()))?;
        match key.as_str() {
            "date" => headers.date = Some(parse_date(value)?),
            "from" => headers.from = Some(value.to_string()),
            "lines" => {
                let count = value
                    .parse::<usize>()
                    .map_err(|e| PostError::InvalidLineCount {
                        value: value.to_string(),
                        reason: e.to_string(),
                    })?;
                headers.lines = Some(count);
            }
            "message-id" => headers.message_id = Some(parse_message_id(value)?),
            "references" => {
                for id in parse_references(value) {
                    if !headers.references.contains(&id) {
                        headers.references.push(id);
                    }
                }
            }
            "subject" => headers.subject = Some(value.to_string()),
            _ => headers
                .unrecognized
                .entry(key)
                .or_default()
                .push(value.to_string()),
        }
    }

    Ok(headers)
}

/// Split a header line on its first colon.
///
/// Returns the case-folded key and the trimmed value.
pub fn split_header(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.to_lowercase(), value.trim()))
}

/// Extract the identity from a `Message-ID` value.
///
/// The value must be wrapped in angle brackets, optionally followed by the
/// `#1/1` suffix some gateways appended.
pub fn parse_message_id(value: &str) -> Result<String, PostError> {
    let inner = value
        .strip_prefix('<')
        .and_then(|v| v.strip_suffix('>').or_else(|| v.strip_suffix(">#1/1")));
    match inner {
        Some(id) => Ok(id.to_string()),
        None => Err(PostError::InvalidMessageId(value.to_string())),
    }
}

/// Split a `References` value into message-ids.
///
/// Brackets and braces become separators, so `<a@b> <c@d}` and `a@b>` both
/// yield clean ids.
pub fn parse_references(value: &str) -> Vec<String> {
    value
        .replace(['<', '>', '{', '}'], " ")
        .split_whitespace()
        .filter(|id| id.len() >= MIN_REFERENCE_LEN)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_header() {
        let (key, value) = split_header("Message-ID:  <a@b>  ").unwrap();
        assert_eq!(key, "message-id");
        assert_eq!(value, "<a@b>");

        let (key, value) = split_header("X-Note: time: 10:00").unwrap();
        assert_eq!(key, "x-note");
        assert_eq!(value, "time: 10:00");

        assert!(split_header("no colon here").is_none());
    }

    #[test]
    fn test_parse_message_id() {
        assert_eq!(parse_message_id("<abc@host>").unwrap(), "abc@host");
        assert_eq!(parse_message_id("<abc@host>#1/1").unwrap(), "abc@host");
        assert_eq!(
            parse_message_id("abc@host"),
            Err(PostError::InvalidMessageId("abc@host".to_string()))
        );
        assert!(parse_message_id("<abc@host").is_err());
    }

    #[test]
    fn test_parse_references() {
        let refs = parse_references("<a1@b.com> <c2@d.com}\t<e3@f.com");
        assert_eq!(refs, vec!["a1@b.com", "c2@d.com", "e3@f.com"]);
    }

    #[test]
    fn test_short_reference_fragments_are_dropped() {
        let refs = parse_references("<1991Nov18.011915.40@x> <8f <19");
        assert_eq!(refs, vec!["1991Nov18.011915.40@x"]);
    }

    #[test]
    fn test_parse_headers_recognized_fields() {
        let headers = parse_headers(&lines(&[
            "From: Someone <someone@example.com>",
            "Subject:   Turn 12 results  ",
            "Date: Tue, 4 Sep 2012 20:37:24 +0200",
            "Message-ID: <abc@host>",
            "Lines: 12",
            "References: <x1@y> <x2@y>",
            "References: <x2@y> <x3@y>",
            "Newsgroups: rec.games.pbm",
            "Path: a!b!c",
            "path: d!e",
        ]))
        .unwrap();

        assert_eq!(headers.from.as_deref(), Some("Someone <someone@example.com>"));
        assert_eq!(headers.subject.as_deref(), Some("Turn 12 results"));
        assert_eq!(headers.message_id.as_deref(), Some("abc@host"));
        assert_eq!(headers.lines, Some(12));
        assert_eq!(headers.references, vec!["x1@y", "x2@y", "x3@y"]);
        assert_eq!(
            headers.date.unwrap().to_rfc3339(),
            "2012-09-04T18:37:24+00:00"
        );
        assert_eq!(headers.unrecognized["newsgroups"], vec!["rec.games.pbm"]);
        assert_eq!(headers.unrecognized["path"], vec!["a!b!c", "d!e"]);
    }

    #[test]
    fn test_non_numeric_lines_fails() {
        let err = parse_headers(&lines(&["Lines: many"])).unwrap_err();
        assert!(matches!(err, PostError::InvalidLineCount { ref value, .. } if value == "many"));
    }

    #[test]
    fn test_bad_date_fails() {
        let err = parse_headers(&lines(&["Date: next Tuesday"])).unwrap_err();
        assert_eq!(err, PostError::UnknownDateLayout("next Tuesday".to_string()));
    }

    #[test]
    fn test_line_without_colon_fails() {
        let err = parse_headers(&lines(&["garbage"])).unwrap_err();
        assert_eq!(err, PostError::InvalidHeaderLine("garbage".to_string()));
    }
}
