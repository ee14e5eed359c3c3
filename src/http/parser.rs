use std::collections::HashMap;
use std::fmt;

use tokio::io::AsyncRead;

use crate::http::reader::{ReadError, SocketReader};
use crate::http::request::{Method, Request, content_length_of};
use crate::http::response::StatusCode;

/// Separates the request head from the body
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug)]
pub enum ParseError {
    /// No request line at all
    EmptyRequestHead,
    /// Request line is not exactly `method target version`
    MalformedRequestLine,
    MissingHostHeader,
    Timeout,
    ConnectionClosed,
    Io(std::io::Error),
}

impl ParseError {
    /// The status to answer with, or `None` when the peer is gone.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParseError::EmptyRequestHead
            | ParseError::MalformedRequestLine
            | ParseError::MissingHostHeader => Some(StatusCode::BadRequest),
            ParseError::Timeout => Some(StatusCode::RequestTimeout),
            ParseError::ConnectionClosed | ParseError::Io(_) => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyRequestHead => write!(f, "empty request head"),
            ParseError::MalformedRequestLine => write!(f, "malformed request line"),
            ParseError::MissingHostHeader => write!(f, "missing Host header"),
            ParseError::Timeout => write!(f, "timed out reading request"),
            ParseError::ConnectionClosed => write!(f, "connection closed mid-request"),
            ParseError::Io(e) => write!(f, "i/o error reading request: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReadError> for ParseError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::Timeout => ParseError::Timeout,
            ReadError::ConnectionClosed => ParseError::ConnectionClosed,
            ReadError::Io(e) => ParseError::Io(e),
        }
    }
}

/// Reads one complete request: the head first, then the body once its
/// length is known. Both phases share the reader's deadline.
pub async fn read_request<R>(reader: &mut SocketReader<R>) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let head = reader.read_until(HEAD_TERMINATOR).await?;
    let mut request = parse_head(&head)?;

    let content_length = content_length_of(&request.headers);
    tracing::debug!(
        method = %request.method,
        target = %request.target,
        content_length,
        buffered = reader.buffered().len(),
        "Parsed request head"
    );

    if content_length > 0 {
        request.body = reader.read_exactly(content_length).await?;
    }

    Ok(request)
}

/// Parses a request head (request line and header lines) into a Request
/// with an empty body. A trailing `\r\n\r\n` is allowed.
pub fn parse_head(head: &[u8]) -> Result<Request, ParseError> {
    let head = head.strip_suffix(HEAD_TERMINATOR).unwrap_or(head);
    let text = String::from_utf8_lossy(head);

    let mut lines = text.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    if request_line.is_empty() {
        return Err(ParseError::EmptyRequestHead);
    }

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine);
    };

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(": ").unwrap_or((line, ""));
        headers.insert(key.to_string(), value.to_string());
    }

    if !headers.contains_key("Host") {
        return Err(ParseError::MissingHostHeader);
    }

    Ok(Request {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
        headers,
        body: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let head = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_head(head).unwrap();

        assert_eq!(parsed.target, "/");
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
        assert!(parsed.body.is_empty());
    }
}
