//! Deadline-bounded buffered reads over a byte stream.

use std::fmt;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::{Instant, timeout_at};

/// Size reserved in the buffer before each socket read
const READ_CHUNK: usize = 4096;

#[derive(Debug)]
pub enum ReadError {
    /// The deadline elapsed before enough bytes arrived
    Timeout,
    /// The peer reached EOF before enough bytes arrived
    ConnectionClosed,
    Io(std::io::Error),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Timeout => write!(f, "read deadline elapsed"),
            ReadError::ConnectionClosed => write!(f, "connection closed by peer"),
            ReadError::Io(e) => write!(f, "socket read failed: {}", e),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        ReadError::Io(e)
    }
}

/// Buffered reader sharing one absolute deadline across every call.
///
/// Bytes pulled from the stream but not yet handed out stay in the buffer
/// and are served first by the next call, so nothing is read twice.
pub struct SocketReader<R> {
    inner: R,
    buffer: BytesMut,
    deadline: Instant,
}

impl<R: AsyncRead + Unpin> SocketReader<R> {
    pub fn new(inner: R, deadline: Instant) -> Self {
        Self {
            inner,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            deadline,
        }
    }

    /// Bytes already read from the stream but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Returns everything up to and including the first `delimiter`.
    pub async fn read_until(&mut self, delimiter: &[u8]) -> Result<Vec<u8>, ReadError> {
        if delimiter.is_empty() {
            return Ok(Vec::new());
        }

        let mut searched = 0;
        loop {
            if let Some(pos) = find(&self.buffer[searched..], delimiter) {
                let end = searched + pos + delimiter.len();
                return Ok(self.buffer.split_to(end).to_vec());
            }

            // A match may straddle the old tail and the next chunk
            searched = self.buffer.len().saturating_sub(delimiter.len() - 1);
            self.fill().await?;
        }
    }

    /// Returns exactly `n` bytes.
    pub async fn read_exactly(&mut self, n: usize) -> Result<Vec<u8>, ReadError> {
        while self.buffer.len() < n {
            self.fill().await?;
        }

        Ok(self.buffer.split_to(n).to_vec())
    }

    async fn fill(&mut self) -> Result<usize, ReadError> {
        self.buffer.reserve(READ_CHUNK);

        let n = timeout_at(self.deadline, self.inner.read_buf(&mut self.buffer))
            .await
            .map_err(|_| ReadError::Timeout)??;

        if n == 0 {
            return Err(ReadError::ConnectionClosed);
        }

        Ok(n)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
}
