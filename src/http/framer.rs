use tracing::debug;

use crate::http::parser::{ParseError, extract_content_length, find_header_end};
use crate::http::ring::CircularBuffer;

/// Where the framer is within the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Waiting for the blank line that ends the header block.
    #[default]
    AwaitingHeader,
    /// Header consumed; waiting for this many body bytes.
    AwaitingBody { declared_body_length: usize },
}

/// Sizes of a request that has been framed and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFrame {
    /// Header block length, CRLFCRLF included.
    pub header_len: usize,
    pub body_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    NeedMoreData,
    RequestComplete(RequestFrame),
}

/// Incremental request framer for a single connection.
///
/// Owns the connection's [`CircularBuffer`] together with its [`ParserState`].
/// Feed it with [`on_bytes_received`](Self::on_bytes_received) and call
/// [`try_frame_one`](Self::try_frame_one) until it stops returning completed
/// requests.
#[derive(Debug)]
pub struct RequestFramer {
    buffer: CircularBuffer,
    state: ParserState,
    header_len: usize,
}

impl RequestFramer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: CircularBuffer::new(capacity),
            state: ParserState::AwaitingHeader,
            header_len: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn buffer(&self) -> &CircularBuffer {
        &self.buffer
    }

    /// Appends a freshly read chunk and returns how many bytes were kept.
    ///
    /// Anything less than `chunk.len()` means the request does not fit.
    pub fn on_bytes_received(&mut self, chunk: &[u8]) -> usize {
        self.buffer.append(chunk)
    }

    /// Advances framing as far as the buffered bytes allow.
    ///
    /// Returns [`Frame::RequestComplete`] once a header block and its declared
    /// body have both been consumed, after which the framer is back in
    /// [`ParserState::AwaitingHeader`].
    pub fn try_frame_one(&mut self) -> Result<Frame, ParseError> {
        if self.state == ParserState::AwaitingHeader {
            let Some(header_len) = find_header_end(&self.buffer) else {
                return Ok(Frame::NeedMoreData);
            };

            let declared_body_length = extract_content_length(&self.buffer, header_len)?;
            if declared_body_length > self.buffer.capacity() {
                return Err(ParseError::body_too_large(declared_body_length, self.buffer.capacity()));
            }

            debug!(header_len, declared_body_length, "header block framed");
            self.buffer.consume(header_len);
            self.header_len = header_len;
            self.state = ParserState::AwaitingBody { declared_body_length };
        }

        let ParserState::AwaitingBody { declared_body_length } = self.state else {
            return Ok(Frame::NeedMoreData);
        };

        if self.buffer.len() < declared_body_length {
            return Ok(Frame::NeedMoreData);
        }

        self.buffer.consume(declared_body_length);
        let frame = RequestFrame {
            header_len: self.header_len,
            body_len: declared_body_length,
        };
        self.state = ParserState::AwaitingHeader;
        self.header_len = 0;

        Ok(Frame::RequestComplete(frame))
    }

    /// Drops buffered bytes and returns to the initial state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = ParserState::AwaitingHeader;
        self.header_len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &[u8] = b"GET / HTTP/1.1\r\nContent-Length: 2\r\n\r\nOK";

    #[test]
    fn whole_request_completes_in_one_call() {
        let mut framer = RequestFramer::new(1024);
        assert_eq!(framer.on_bytes_received(REQUEST), REQUEST.len());

        assert_eq!(
            framer.try_frame_one(),
            Ok(Frame::RequestComplete(RequestFrame { header_len: 37, body_len: 2 }))
        );
        assert_eq!(framer.state(), ParserState::AwaitingHeader);
        assert!(framer.buffer().is_empty());
        assert_eq!(framer.try_frame_one(), Ok(Frame::NeedMoreData));
    }

    #[test]
    fn waits_for_body_after_header() {
        let mut framer = RequestFramer::new(64);
        framer.on_bytes_received(b"POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\nab");

        assert_eq!(framer.try_frame_one(), Ok(Frame::NeedMoreData));
        assert_eq!(framer.state(), ParserState::AwaitingBody { declared_body_length: 4 });
        assert_eq!(framer.buffer().len(), 2);

        framer.on_bytes_received(b"cd");
        assert!(matches!(framer.try_frame_one(), Ok(Frame::RequestComplete(f)) if f.body_len == 4));
    }

    #[test]
    fn leftover_bytes_stay_buffered() {
        let mut framer = RequestFramer::new(128);
        framer.on_bytes_received(b"A\r\n\r\nB\r\n\r\n");

        assert!(matches!(framer.try_frame_one(), Ok(Frame::RequestComplete(f)) if f.header_len == 5));
        assert_eq!(framer.buffer().len(), 5);
        assert!(matches!(framer.try_frame_one(), Ok(Frame::RequestComplete(f)) if f.header_len == 5));
    }

    #[test]
    fn oversized_declaration_is_rejected() {
        let mut framer = RequestFramer::new(64);
        framer.on_bytes_received(b"POST / HTTP/1.1\r\nContent-Length: 65\r\n\r\n");

        assert_eq!(framer.try_frame_one(), Err(ParseError::body_too_large(65, 64)));
    }

    #[test]
    fn body_of_exactly_capacity_is_accepted() {
        let mut framer = RequestFramer::new(64);
        framer.on_bytes_received(b"POST / HTTP/1.1\r\nContent-Length: 64\r\n\r\n");
        assert_eq!(framer.try_frame_one(), Ok(Frame::NeedMoreData));

        assert_eq!(framer.on_bytes_received(&[b'x'; 64]), 64);
        assert!(matches!(framer.try_frame_one(), Ok(Frame::RequestComplete(f)) if f.body_len == 64));
    }

    #[test]
    fn reset_discards_partial_request() {
        let mut framer = RequestFramer::new(64);
        framer.on_bytes_received(b"POST / HTTP/1.1\r\nContent-Length: 9\r\n\r\nab");
        assert_eq!(framer.try_frame_one(), Ok(Frame::NeedMoreData));

        framer.reset();
        assert_eq!(framer.state(), ParserState::AwaitingHeader);
        assert!(framer.buffer().is_empty());
    }
}
