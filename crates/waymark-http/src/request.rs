//! HTTP request type.
//!
//! [`HttpRequest`] is what a route handler receives: method, path, query
//! string, headers, body, and the parameters captured when the path matched
//! a route template.

use http::{HeaderMap, Method};

use crate::params::RouteParams;

/// An incoming HTTP request together with its captured route parameters.
///
/// Instances are typically created from an incoming Axum request via
/// [`HttpRequest::from_axum`], or with [`HttpRequest::builder`] in tests.
///
/// # Examples
///
/// ```
/// use waymark_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/users/42")
///     .query_string("tab=posts")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.path(), "/users/42");
/// assert!(request.params().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    params: RouteParams,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`] for constructing an `HttpRequest`.
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from an Axum/hyper request and its body bytes.
    pub fn from_axum(parts: http::request::Parts, body: Vec<u8>) -> Self {
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query_string: parts.uri.query().unwrap_or("").to_string(),
            content_type,
            headers: parts.headers,
            body,
            params: RouteParams::new(),
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the content type of the request body, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw request body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the parameters captured by the matched route.
    pub const fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Returns a single captured parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Replaces the captured parameters on this request.
    pub fn set_params(&mut self, params: RouteParams) {
        self.params = params;
    }

    /// Returns the full path including the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use waymark_http::HttpRequest;
    ///
    /// let request = HttpRequest::builder()
    ///     .path("/articles")
    ///     .query_string("page=2")
    ///     .build();
    /// assert_eq!(request.get_full_path(), "/articles?page=2");
    /// ```
    pub fn get_full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }
}

/// Builder for constructing [`HttpRequest`] instances in tests.
///
/// This provides a fluent API for building requests without needing
/// a full Axum request.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    params: RouteParams,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            content_type: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            params: RouteParams::new(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Adds a header. Invalid header names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Presets captured route parameters.
    #[must_use]
    pub fn params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    /// Builds the [`HttpRequest`].
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            content_type: self.content_type,
            headers: self.headers,
            body: self.body,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let req = HttpRequest::builder().build();
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.path(), "/");
        assert_eq!(req.query_string(), "");
        assert!(req.content_type().is_none());
        assert!(req.body().is_empty());
        assert!(req.params().is_empty());
    }

    #[test]
    fn test_builder_method() {
        let req = HttpRequest::builder().method(Method::POST).build();
        assert_eq!(req.method(), &Method::POST);
    }

    #[test]
    fn test_get_full_path_no_query() {
        let req = HttpRequest::builder().path("/articles").build();
        assert_eq!(req.get_full_path(), "/articles");
    }

    #[test]
    fn test_builder_header() {
        let req = HttpRequest::builder()
            .header("x-request-id", "abc")
            .header("bad header", "ignored")
            .build();
        assert_eq!(req.headers().len(), 1);
        assert_eq!(req.headers().get("x-request-id").unwrap(), "abc");
    }

    #[test]
    fn test_set_params() {
        let mut req = HttpRequest::builder().build();
        let mut params = RouteParams::new();
        params.insert("id", "7");
        req.set_params(params);
        assert_eq!(req.param("id"), Some("7"));
    }

    #[test]
    fn test_from_axum() {
        let (parts, ()) = http::Request::builder()
            .method(Method::PUT)
            .uri("http://example.com/users/5?force=1")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(())
            .unwrap()
            .into_parts();

        let req = HttpRequest::from_axum(parts, b"{}".to_vec());
        assert_eq!(req.method(), &Method::PUT);
        assert_eq!(req.path(), "/users/5");
        assert_eq!(req.query_string(), "force=1");
        assert_eq!(req.content_type(), Some("application/json"));
        assert_eq!(req.body(), b"{}");
    }
}
