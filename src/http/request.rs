use std::collections::HashMap;
use std::fmt;

use crate::http::encoding;

/// HTTP request methods.
///
/// The router serves GET and POST, answers PUT and DELETE with 405 and
/// anything else with 400. Unknown tokens are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
    /// Any token not listed above
    Other(String),
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use wicket::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed HTTP request.
///
/// Header names are case-sensitive; a repeated name keeps the last value.
/// Requests produced by the parser always carry a `Host` header.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// The raw request-target (e.g. "/echo/hello")
    pub target: String,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
    pub headers: HashMap<String, String>,
    /// Exactly `Content-Length` bytes
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            target: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            target: self.target.ok_or("target missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Looks up a header by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(key)
            .map(|v| v.as_str())
    }

    /// The declared Content-Length.
    ///
    /// Returns 0 if the header is missing, negative or not a number.
    pub fn content_length(&self) -> usize {
        content_length_of(&self.headers)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.header("User-Agent")
    }

    /// The request target split on `/`, empty components dropped.
    ///
    /// ```
    /// # use wicket::http::request::{Method, RequestBuilder};
    /// let req = RequestBuilder::new().method(Method::GET).target("//files/a.txt/").build().unwrap();
    /// assert_eq!(req.segments(), vec!["files", "a.txt"]);
    /// ```
    pub fn segments(&self) -> Vec<&str> {
        self.target
            .split('/')
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Whether `Accept-Encoding` lists `coding`.
    pub fn accepts_encoding(&self, coding: &str) -> bool {
        self.header("Accept-Encoding")
            .map(|v| encoding::accepted_codings(v).any(|c| c == coding))
            .unwrap_or(false)
    }
}

pub(crate) fn content_length_of(headers: &HashMap<String, String>) -> usize {
    headers
        .get("Content-Length")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
