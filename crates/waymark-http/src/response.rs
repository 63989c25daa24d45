//! HTTP response types.
//!
//! [`HttpResponse`] is what route handlers return. Its content type starts out
//! *unset*: a response that never had [`HttpResponse::set_content_type`]
//! called reports `text/html`, and the matched route's content type (from a
//! `json:`/`csv:`/... prefix) may still be applied to it. A handler that sets
//! a content type explicitly keeps it. The status works the same way: a
//! response built with [`HttpResponse::ok`] (or [`HttpResponse::json`]) has
//! no explicit status, so a route's status override replaces its `200 OK`.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::urls::content_type::DEFAULT_CONTENT_TYPE;

/// The body content of an HTTP response.
pub enum ResponseContent {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
}

impl std::fmt::Debug for ResponseContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Text(t) => f
                .debug_tuple("Text")
                .field(&t.chars().take(100).collect::<String>())
                .finish(),
        }
    }
}

/// An HTTP response produced by a route handler.
///
/// All responses can be converted to an Axum response via [`IntoResponse`].
///
/// # Examples
///
/// ```
/// use waymark_http::HttpResponse;
///
/// let response = HttpResponse::ok("Hello, World!");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.content_type(), "text/html");
/// assert!(!response.has_explicit_content_type());
/// ```
pub struct HttpResponse {
    status: StatusCode,
    explicit_status: bool,
    headers: HeaderMap,
    content: ResponseContent,
    charset: String,
    content_type: Option<String>,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("explicit_status", &self.explicit_status)
            .field("content_type", &self.content_type)
            .field("charset", &self.charset)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with the given status code and text body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            explicit_status: true,
            headers: HeaderMap::new(),
            content: ResponseContent::Text(body.into()),
            charset: "utf-8".to_string(),
            content_type: None,
        }
    }

    /// Creates a new `HttpResponse` with the given status code and byte body.
    pub fn with_bytes(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            explicit_status: true,
            headers: HeaderMap::new(),
            content: ResponseContent::Bytes(body),
            charset: "utf-8".to_string(),
            content_type: None,
        }
    }

    /// Creates a 200 OK response with the given body.
    ///
    /// The status is not explicit: a route status override replaces it.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            explicit_status: false,
            ..Self::new(StatusCode::OK, body)
        }
    }

    /// Creates a 200 OK response with `value` serialized as JSON.
    ///
    /// Falls back to a 500 response if serialization fails.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => {
                let mut response = Self::ok(json);
                response.set_content_type("application/json");
                response
            }
            Err(e) => Self::server_error(format!("JSON serialization error: {e}")),
        }
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// Creates a 403 Forbidden response.
    pub fn forbidden(body: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, body)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code explicitly.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.explicit_status = true;
    }

    /// Returns `true` if the status was chosen explicitly, through
    /// [`new`](Self::new), a status-specific constructor, or
    /// [`set_status`](Self::set_status).
    pub const fn has_explicit_status(&self) -> bool {
        self.explicit_status
    }

    /// Returns a reference to the headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Adds a header to the response.
    #[must_use]
    pub fn set_header(mut self, name: http::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the charset.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Sets the charset.
    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.charset = charset.into();
    }

    /// Returns the content type, `text/html` when none was set.
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Sets the content type explicitly.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = Some(content_type.into());
    }

    /// Returns `true` if [`set_content_type`](Self::set_content_type) was called.
    pub const fn has_explicit_content_type(&self) -> bool {
        self.content_type.is_some()
    }

    /// Returns the response body as a reference to the content enum.
    pub const fn content(&self) -> &ResponseContent {
        &self.content
    }

    /// Replaces the response body with text.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.content = ResponseContent::Text(body.into());
    }

    /// Returns the body as bytes.
    pub fn content_bytes(&self) -> Vec<u8> {
        match &self.content {
            ResponseContent::Bytes(b) => b.clone(),
            ResponseContent::Text(t) => t.as_bytes().to_vec(),
        }
    }

    /// Returns the full content type header value including charset.
    fn full_content_type(&self) -> String {
        let content_type = self.content_type();
        if content_type.starts_with("text/") || content_type.contains("json") {
            format!("{content_type}; charset={}", self.charset)
        } else {
            content_type.to_string()
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let full_content_type = self.full_content_type();
        let body = match self.content {
            ResponseContent::Text(text) => axum::body::Body::from(text),
            ResponseContent::Bytes(bytes) => axum::body::Body::from(bytes),
        };

        let mut response = axum::response::Response::new(body);
        *response.status_mut() = self.status;
        if let Ok(ct) = HeaderValue::from_str(&full_content_type) {
            response.headers_mut().insert(http::header::CONTENT_TYPE, ct);
        }
        for (key, value) in &self.headers {
            response.headers_mut().insert(key, value.clone());
        }
        response
    }
}

/// An HTTP redirect response.
pub struct HttpResponseRedirect;

impl HttpResponseRedirect {
    /// Creates a 302 Found redirect to the given URL.
    pub fn new(url: &str) -> HttpResponse {
        Self::with_status(url, StatusCode::FOUND)
    }

    /// Creates a 301 Moved Permanently redirect to the given URL.
    pub fn permanent(url: &str) -> HttpResponse {
        Self::with_status(url, StatusCode::MOVED_PERMANENTLY)
    }

    /// Creates a redirect to the given URL with an explicit status code.
    pub fn with_status(url: &str, status: StatusCode) -> HttpResponse {
        let mut response = HttpResponse::new(status, "");
        if let Ok(value) = HeaderValue::from_str(url) {
            response.headers.insert(http::header::LOCATION, value);
        }
        response
    }
}
