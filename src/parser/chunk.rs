//! Splits the raw archive into per-message chunks.
//!
//! Every message starts with a `From <signed integer>` delimiter line. The
//! lines after it, up to the first blank line, are the header; the remaining
//! lines up to the next delimiter (or end of input) are the body. Two blank
//! lines closing the body are the separator between messages and are not
//! part of either one.

use crate::parser::decode::split_lines;
use crate::parser::repair::RepairTable;

/// One message's raw lines, as found in the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based archive line of the `From ` delimiter.
    pub line: usize,
    /// The delimiter line itself.
    pub from: String,
    /// Header lines with continuations folded into the line they continue.
    pub header: Vec<String>,
    pub body: Vec<String>,
    /// Number of archive lines this chunk covers, delimiter and separator included.
    pub span: usize,
}

impl Chunk {
    /// The text after `From ` on the delimiter line.
    pub fn delimiter_id(&self) -> &str {
        self.from.strip_prefix("From ").unwrap_or(&self.from)
    }
}

/// The chunked archive.
#[derive(Debug, Clone, Default)]
pub struct Chunks {
    pub chunks: Vec<Chunk>,
    /// Lines before the first delimiter.
    pub preamble: usize,
    /// Total number of lines in the archive.
    pub total_lines: usize,
}

/// Split the archive into chunks, applying `repairs` to every header line.
pub fn split_chunks(input: &[u8], repairs: &RepairTable) -> Chunks {
    let lines = split_lines(input);
    let mut chunks = Vec::new();

    let mut n = lines
        .iter()
        .position(|line| is_delimiter(line))
        .unwrap_or(lines.len());
    let preamble = n;

    while n < lines.len() {
        let start = n;
        let mut chunk = Chunk {
            line: n + 1,
            from: lines[n].clone(),
            ..Chunk::default()
        };
        n += 1;

        while n < lines.len() {
            let line = &lines[n];
            if ends_header(line) {
                n += 1;
                break;
            }
            if is_delimiter(line) {
                break;
            }

            // header should never have tabs in it
            let line = line.replace('\t', " ");
            let line = repairs.apply(&line).into_owned();
            match chunk.header.last_mut() {
                Some(last) if line.starts_with(' ') => last.push_str(&line),
                _ => chunk.header.push(line),
            }
            n += 1;
        }

        while n < lines.len() && !is_delimiter(&lines[n]) {
            chunk.body.push(lines[n].clone());
            n += 1;
        }
        let len = chunk.body.len();
        if len >= 2 && chunk.body[len - 1].is_empty() && chunk.body[len - 2].is_empty() {
            chunk.body.truncate(len - 2);
        }

        chunk.span = n - start;
        chunks.push(chunk);
    }

    Chunks {
        chunks,
        preamble,
        total_lines: lines.len(),
    }
}

/// Check whether a line is a message delimiter: `From ` followed by a signed integer.
pub fn is_delimiter(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("From ") else {
        return false;
    };
    let digits = rest.strip_prefix('-').unwrap_or(rest);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// A blank line, or a line holding a single space or tab, closes the header.
///
/// Lines arrive right-trimmed, so a lone space or tab shows up here as empty.
fn ends_header(line: &str) -> bool {
    line.is_empty() || line == " " || line == "\t"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks_of(text: &str) -> Chunks {
        split_chunks(text.as_bytes(), &RepairTable::builtin())
    }

    #[test]
    fn test_is_delimiter() {
        assert!(is_delimiter("From 123"));
        assert!(is_delimiter("From -3534941848242442294"));
        assert!(!is_delimiter("From "));
        assert!(!is_delimiter("From -"));
        assert!(!is_delimiter("From user@example.com Thu Jan 01 00:00:00 2024"));
        assert!(!is_delimiter(">From 123"));
        assert!(!is_delimiter("From 12a"));
    }

    #[test]
    fn test_two_messages() {
        let text = "From 1\nSubject: one\n\nbody one\n\n\nFrom 2\nSubject: two\n\nbody two\n";
        let chunks = chunks_of(text);
        assert_eq!(chunks.chunks.len(), 2);

        let first = &chunks.chunks[0];
        assert_eq!(first.line, 1);
        assert_eq!(first.from, "From 1");
        assert_eq!(first.header, vec!["Subject: one"]);
        assert_eq!(first.body, vec!["body one"]);

        let second = &chunks.chunks[1];
        assert_eq!(second.line, 7);
        assert_eq!(second.delimiter_id(), "2");
        assert_eq!(second.body, vec!["body two"]);
    }

    #[test]
    fn test_continuation_lines_are_folded() {
        let text = "From 1\nReferences: <a@b>\n <c@d>\n\t<e@f>\nSubject: x\n\nbody\n";
        let chunks = chunks_of(text);
        let header = &chunks.chunks[0].header;
        assert_eq!(header.len(), 2);
        assert_eq!(header[0], "References: <a@b> <c@d> <e@f>");
        assert_eq!(header[1], "Subject: x");
    }

    #[test]
    fn test_single_space_line_ends_header() {
        let text = "From 1\nSubject: x\n \nbody line\n";
        let chunks = chunks_of(text);
        assert_eq!(chunks.chunks[0].header, vec!["Subject: x"]);
        assert_eq!(chunks.chunks[0].body[0], "body line");
    }

    #[test]
    fn test_repairs_are_applied_to_header_lines() {
        let text = "From 1\nDate: 11 Sep 93 12:58:28 -500\n\nDate: 11 Sep 93 12:58:28 -500\n";
        let chunk = &chunks_of(text).chunks[0];
        assert_eq!(chunk.header[0], "Date: 11 Sep 93 12:58:28 -0500");
        // body lines are never repaired
        assert_eq!(chunk.body[0], "Date: 11 Sep 93 12:58:28 -500");
    }

    #[test]
    fn test_preamble_is_skipped() {
        let text = "junk\nmore junk\nFrom 5\nSubject: x\n\nbody\n";
        let chunks = chunks_of(text);
        assert_eq!(chunks.preamble, 2);
        assert_eq!(chunks.chunks.len(), 1);
        assert_eq!(chunks.chunks[0].line, 3);
    }

    #[test]
    fn test_no_lines_created_or_destroyed() {
        let text = "preamble\nFrom 1\nSubject: a\n continued\n\nline\n\n\nFrom -2\nSubject: b\n\n\
                    text\n\nmore\n\n\nFrom 3\n\nonly body\n";
        let chunks = chunks_of(text);
        let covered: usize = chunks.chunks.iter().map(|c| c.span).sum();
        assert_eq!(chunks.preamble + covered, chunks.total_lines);

        for pair in chunks.chunks.windows(2) {
            assert_eq!(pair[0].line + pair[0].span, pair[1].line);
        }
    }

    #[test]
    fn test_body_keeps_inner_blank_lines() {
        let text = "From 1\nSubject: a\n\npara one\n\npara two\n\n\nFrom 2\n\nx\n";
        let chunk = &chunks_of(text).chunks[0];
        assert_eq!(chunk.body, vec!["para one", "", "para two"]);
    }

    #[test]
    fn test_from_prose_after_blank_lines_stays_in_body() {
        let text = "From 1\nSubject: a\n\nbody\n\n\nFrom the desk of x\nmore\n";
        let chunks = chunks_of(text);
        assert_eq!(chunks.chunks.len(), 1);
        assert_eq!(
            chunks.chunks[0].body,
            vec!["body", "", "", "From the desk of x", "more"]
        );
        assert_eq!(chunks.chunks[0].span, chunks.total_lines);
    }

    #[test]
    fn test_header_cut_short_by_next_delimiter() {
        let text = "From 1\nSubject: a\nFrom 2\nSubject: b\n\nbody\n";
        let chunks = chunks_of(text);
        assert_eq!(chunks.chunks.len(), 2);
        assert!(chunks.chunks[0].body.is_empty());
        assert_eq!(chunks.chunks[1].header, vec!["Subject: b"]);
    }

    #[test]
    fn test_empty_archive() {
        let chunks = chunks_of("");
        assert!(chunks.chunks.is_empty());
        assert_eq!(chunks.total_lines, 0);
    }
}
