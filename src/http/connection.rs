use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, info, warn};

use crate::http::framer::{Frame, RequestFrame, RequestFramer};
use crate::http::parser::ParseError;
use crate::http::writer::ResponseWriter;

pub struct Connection<S> {
    stream: S,
    framer: RequestFramer,
    chunk: BytesMut,
    chunk_size: usize,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Writing(ResponseWriter, RequestFrame),
    Closed(Outcome),
}

/// How a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A request was framed and the canned response was sent.
    Responded(RequestFrame),
    /// The peer hung up before a full request arrived.
    PeerClosed,
    /// A read did not fit in the framing buffer.
    Overflow { written: usize, requested: usize },
    /// The header block could not be framed.
    Rejected(ParseError),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, buffer_capacity: usize, chunk_size: usize) -> Self {
        Self {
            stream,
            framer: RequestFramer::new(buffer_capacity),
            chunk: BytesMut::with_capacity(chunk_size),
            chunk_size,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection until it closes. Exactly one request is served.
    pub async fn run(&mut self) -> anyhow::Result<Outcome> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = self.read_request().await?;
                }

                ConnectionState::Writing(writer, frame) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    info!(header_len = frame.header_len, body_len = frame.body_len, "response sent");
                    self.state = ConnectionState::Closed(Outcome::Responded(*frame));
                }

                ConnectionState::Closed(outcome) => {
                    return Ok(outcome.clone());
                }
            }
        }
    }

    /// Reads until one request is framed or the connection has to be dropped.
    pub async fn read_request(&mut self) -> anyhow::Result<ConnectionState> {
        loop {
            self.chunk.clear();
            self.chunk.reserve(self.chunk_size);
            let n = self.stream.read_buf(&mut self.chunk).await?;

            if n == 0 {
                debug!(buffered = self.framer.buffer().len(), "peer closed connection");
                return Ok(ConnectionState::Closed(Outcome::PeerClosed));
            }

            let written = self.framer.on_bytes_received(&self.chunk);
            if written < n {
                warn!(written, requested = n, "framing buffer overflow, dropping connection");
                return Ok(ConnectionState::Closed(Outcome::Overflow { written, requested: n }));
            }

            match self.framer.try_frame_one() {
                Ok(Frame::NeedMoreData) => {}
                Ok(Frame::RequestComplete(frame)) => {
                    return Ok(ConnectionState::Writing(ResponseWriter::canned(), frame));
                }
                Err(e) => {
                    warn!(error = %e, "rejecting request");
                    return Ok(ConnectionState::Closed(Outcome::Rejected(e)));
                }
            }
        }
    }
}
