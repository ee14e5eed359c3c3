use std::collections::BTreeMap;

/// Default media type for non-empty bodies
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// HTTP status codes the server can answer with.
///
/// The set is closed: routes and the connection handler only ever produce
/// these seven codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 408 Request Timeout
    RequestTimeout,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use wicket::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::RequestTimeout.as_u16(), 408);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::RequestTimeout => 408,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Looks up a numeric code; `None` if it is outside the supported set.
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            201 => Some(StatusCode::Created),
            400 => Some(StatusCode::BadRequest),
            404 => Some(StatusCode::NotFound),
            405 => Some(StatusCode::MethodNotAllowed),
            408 => Some(StatusCode::RequestTimeout),
            500 => Some(StatusCode::InternalServerError),
            _ => None,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use wicket::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Headers live in a sorted map so the wire order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: BTreeMap<String, String>,
    /// Body bytes exactly as transmitted (after any content encoding)
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use wicket::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("application/octet-stream")
///     .body(b"abc".to_vec())
///     .build();
/// assert_eq!(response.headers["Content-Length"], "3");
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: BTreeMap<String, String>,
    content_type: String,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Media type used when the body is non-empty.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the response body. Encode before calling this.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// `Content-Type` is only kept for a non-empty body. `Content-Length`
    /// is always set to the body length, replacing any explicit value.
    pub fn build(mut self) -> Response {
        if self.body.is_empty() {
            self.headers.remove("Content-Type");
        } else {
            self.headers
                .entry("Content-Type".to_string())
                .or_insert(self.content_type);
        }

        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A response with the given status and no body.
    pub fn empty(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    /// A 200 OK `text/plain` response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .body(body.into())
            .build()
    }

    pub fn created() -> Self {
        Self::empty(StatusCode::Created)
    }

    pub fn bad_request() -> Self {
        Self::empty(StatusCode::BadRequest)
    }

    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::empty(StatusCode::MethodNotAllowed)
    }

    pub fn request_timeout() -> Self {
        Self::empty(StatusCode::RequestTimeout)
    }

    pub fn internal_error() -> Self {
        Self::empty(StatusCode::InternalServerError)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }
}
