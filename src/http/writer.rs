use tokio::io::{AsyncWrite, AsyncWriteExt};

/// The only response this server ever sends.
pub const CANNED_RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK";

pub struct ResponseWriter {
    buffer: &'static [u8],
    written: usize,
}

impl ResponseWriter {
    pub fn canned() -> Self {
        Self {
            buffer: CANNED_RESPONSE,
            written: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.written == self.buffer.len()
    }

    /// Writes whatever is still pending, resuming after short writes.
    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
