//! Byte-level line handling for the raw archive.

use std::borrow::Cow;

/// Split the archive into lines, trimming trailing spaces, carriage returns
/// and tabs from every line.
///
/// The archive has no declared encoding. Lines are decoded as UTF-8 and fall
/// back to Windows-1252 (which accepts every byte) when that fails.
pub fn split_lines(input: &[u8]) -> Vec<String> {
    // Strip BOM if present
    let input = input.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(input);
    // A final newline terminates the last line rather than starting a new one.
    let input = input.strip_suffix(b"\n").unwrap_or(input);
    if input.is_empty() {
        return Vec::new();
    }

    input
        .split(|&b| b == b'\n')
        .map(|line| decode_line(trim_line_end(line)).into_owned())
        .collect()
}

/// Trim trailing `' '`, `'\r'` and `'\t'` bytes.
fn trim_line_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| !matches!(b, b' ' | b'\r' | b'\t'))
        .map_or(0, |pos| pos + 1);
    &line[..end]
}

fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded
        }
    }
}
