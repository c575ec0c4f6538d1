use thiserror::Error;

use crate::http::ring::CircularBuffer;

const HEADER_TERMINATOR: &[u8; 4] = b"\r\n\r\n";
const CONTENT_LENGTH: &[u8] = b"Content-Length:";

/// Longest digit run read from a `Content-Length` value; extra digits are ignored.
const MAX_LENGTH_DIGITS: usize = 31;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("declared body length {declared} exceeds buffer capacity {capacity}")]
    BodyTooLarge { declared: usize, capacity: usize },
}

impl ParseError {
    pub fn invalid_content_length<S: ToString>(reason: S) -> Self {
        Self::InvalidContentLength { reason: reason.to_string() }
    }

    pub fn body_too_large(declared: usize, capacity: usize) -> Self {
        Self::BodyTooLarge { declared, capacity }
    }
}

/// Finds the end of the header block, terminator included.
///
/// Returns the length of the header measured from the read cursor, or `None`
/// when no blank line has been buffered yet. The earliest terminator wins.
pub fn find_header_end(buf: &CircularBuffer) -> Option<usize> {
    if buf.len() < HEADER_TERMINATOR.len() {
        return None;
    }

    (0..=buf.len() - HEADER_TERMINATOR.len())
        .find(|&i| {
            HEADER_TERMINATOR
                .iter()
                .enumerate()
                .all(|(k, &b)| buf.peek(i + k) == b)
        })
        .map(|i| i + HEADER_TERMINATOR.len())
}

/// Reads the `Content-Length` value out of the first `header_len` buffered bytes.
///
/// The field name is matched case-insensitively at the start of a line and only
/// the first matching line counts. A missing field, or one without digits,
/// yields 0.
pub fn extract_content_length(buf: &CircularBuffer, header_len: usize) -> Result<usize, ParseError> {
    let mut line_start = 0;

    while line_start < header_len {
        let line_end = find_line_end(buf, line_start, header_len);

        // blank line ends the header block
        if line_end == line_start {
            break;
        }

        if line_has_prefix(buf, line_start, line_end, CONTENT_LENGTH) {
            return parse_length_value(buf, line_start + CONTENT_LENGTH.len(), line_end);
        }

        line_start = line_end + 2;
    }

    Ok(0)
}

/// Offset of the CR that ends the line starting at `start`, or the last
/// in-range offset when the span ends first.
fn find_line_end(buf: &CircularBuffer, start: usize, limit: usize) -> usize {
    let mut end = start;
    while end + 1 < limit {
        if buf.peek(end) == b'\r' && buf.peek(end + 1) == b'\n' {
            break;
        }
        end += 1;
    }
    end
}

fn line_has_prefix(buf: &CircularBuffer, start: usize, end: usize, prefix: &[u8]) -> bool {
    end - start >= prefix.len()
        && prefix
            .iter()
            .enumerate()
            .all(|(k, b)| buf.peek(start + k).eq_ignore_ascii_case(b))
}

fn parse_length_value(buf: &CircularBuffer, start: usize, end: usize) -> Result<usize, ParseError> {
    let mut pos = start;
    while pos < end && matches!(buf.peek(pos), b' ' | b'\t') {
        pos += 1;
    }

    let mut value: usize = 0;
    let mut digits = 0;
    while pos < end && digits < MAX_LENGTH_DIGITS {
        let c = buf.peek(pos);
        if !c.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(usize::from(c - b'0')))
            .ok_or_else(|| ParseError::invalid_content_length("value does not fit in usize"))?;
        digits += 1;
        pos += 1;
    }

    Ok(value)
}
