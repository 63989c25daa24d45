//! The route table.
//!
//! Routes are keyed by their normalized path: a second registration for the
//! same path replaces the first one entirely (method, handler, status, and
//! content type) and takes over its place in registration order. Lookup walks
//! the routes in that order and the first structural match wins; there is no
//! ranking by specificity.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;

use waymark_core::{RoutingSettings, WaymarkError, WaymarkResult};

use super::path;
use super::pattern::RoutePattern;
use crate::{BoxFuture, HttpRequest, HttpResponse, Method, RouteParams};

/// The type for route handler functions.
///
/// A handler is an async function that takes the [`HttpRequest`] (carrying its
/// captured parameters) and returns an [`HttpResponse`]. It is wrapped in an
/// `Arc` so it can be shared across threads.
pub type RouteHandler = Arc<dyn Fn(HttpRequest) -> BoxFuture + Send + Sync>;

/// A registered route.
pub struct RouteEntry {
    path: String,
    shape: String,
    pattern: RoutePattern,
    method: Method,
    handler: RouteHandler,
    status: Option<StatusCode>,
    content_type: &'static str,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl RouteEntry {
    /// Returns the normalized path this route is keyed by.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the parsed template.
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Returns the method this route serves.
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Returns the handler.
    pub const fn handler(&self) -> &RouteHandler {
        &self.handler
    }

    /// Returns the status override, if any.
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the content type selected by the path prefix.
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// The outcome of a successful route lookup.
#[derive(Clone)]
pub struct ResolvedRoute {
    /// The normalized path of the matched route.
    pub route: String,
    /// The handler to call.
    pub handler: RouteHandler,
    /// Values captured from the path.
    pub params: RouteParams,
    /// The content type responses from this route carry.
    pub content_type: &'static str,
    /// The status responses from this route carry, if overridden.
    pub status: Option<StatusCode>,
}

impl fmt::Debug for ResolvedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("route", &self.route)
            .field("params", &self.params)
            .field("content_type", &self.content_type)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl ResolvedRoute {
    /// Applies the route's content type and status override to `response`.
    ///
    /// They act as defaults the handler can override: each is applied only
    /// when the handler did not choose that value explicitly. A response from
    /// [`HttpResponse::ok`] takes the override; one built with
    /// `HttpResponse::new(StatusCode::OK, ..)` keeps its `200 OK`.
    pub fn apply(&self, response: &mut HttpResponse) {
        if !response.has_explicit_content_type() {
            response.set_content_type(self.content_type);
        }
        if let Some(status) = self.status {
            if !response.has_explicit_status() {
                response.set_status(status);
            }
        }
    }

    /// Hands `request` to the handler with the captured parameters attached,
    /// then applies the route defaults to the handler's response.
    pub async fn call(mut self, mut request: HttpRequest) -> HttpResponse {
        request.set_params(std::mem::take(&mut self.params));
        let mut response = (self.handler)(request).await;
        self.apply(&mut response);
        response
    }
}

/// The registry of routes, in registration order.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
    settings: RoutingSettings,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("entries", &self.entries)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl RouteTable {
    /// Creates an empty table with lenient registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with the given registration strictness.
    pub fn with_settings(settings: RoutingSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Registers `handler` for `raw_path`.
    ///
    /// The path loses any content-type prefix and its outer slashes; the
    /// result is the route's key. An existing route with the same key is
    /// replaced in place, whatever its method.
    ///
    /// # Errors
    ///
    /// - [`WaymarkError::InvalidArgument`] if `status` is not a valid HTTP status code.
    /// - [`WaymarkError::ImproperlyConfigured`] for a malformed template when
    ///   [`RoutingSettings::strict_templates`] is set.
    /// - [`WaymarkError::Conflict`] for a duplicate path when
    ///   [`RoutingSettings::reject_duplicates`] is set.
    pub fn register(
        &mut self,
        raw_path: &str,
        method: Method,
        handler: RouteHandler,
        status: Option<u16>,
    ) -> WaymarkResult<()> {
        let status = status.map(parse_status).transpose()?;
        let (normalized, content_type) = path::normalize(raw_path);
        let pattern = RoutePattern::parse(normalized);

        if self.settings.strict_templates {
            pattern.validate()?;
        }

        let entry = RouteEntry {
            path: normalized.to_string(),
            shape: RoutePattern::shape(normalized),
            pattern,
            method,
            handler,
            status,
            content_type,
        };

        if let Some(&position) = self.index.get(normalized) {
            if self.settings.reject_duplicates {
                return Err(WaymarkError::Conflict(format!(
                    "A route is already registered for '{normalized}'"
                )));
            }
            tracing::warn!(
                path = normalized,
                previous_method = %self.entries[position].method,
                method = %method,
                "Replacing previously registered route"
            );
            self.entries[position] = entry;
        } else {
            tracing::debug!(path = normalized, method = %method, content_type, "Registered route");
            self.index.insert(normalized.to_string(), self.entries.len());
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Finds the first route serving `method` whose pattern matches
    /// `current_path`, and binds its parameters into `params`.
    ///
    /// Routes registered for another method are skipped; [`Method::Any`]
    /// routes serve every method. `params` is only written on a match.
    pub fn lookup(
        &self,
        current_path: &str,
        method: &http::Method,
        params: &mut RouteParams,
    ) -> Option<&RouteEntry> {
        let current = path::segments(current_path);
        let entry = self
            .entries
            .iter()
            .filter(|entry| entry.method.accepts(method))
            .find(|entry| entry.pattern.matches(&current))?;
        entry.pattern.bind(&current, params);
        Some(entry)
    }

    /// Returns `true` if a route with the shape of `raw_path` is registered.
    ///
    /// Placeholders are compared by position only, so `users/{id}` and
    /// `users/{name?}` have the same shape. Other text must match exactly
    /// after normalization.
    pub fn exists(&self, raw_path: &str) -> bool {
        let (normalized, _) = path::normalize(raw_path);
        let shape = RoutePattern::shape(normalized);
        self.entries.iter().any(|entry| entry.shape == shape)
    }

    /// Returns the route registered under the normalized key `path`.
    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.index.get(path).map(|&position| &self.entries[position])
    }

    /// Iterates over routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validates an integer HTTP status code (100 to 599).
pub(crate) fn parse_status(code: u16) -> WaymarkResult<StatusCode> {
    match code {
        100..=599 => StatusCode::from_u16(code).map_err(|e| {
            WaymarkError::InvalidArgument(format!("Invalid HTTP status code {code}: {e}"))
        }),
        _ => Err(WaymarkError::InvalidArgument(format!(
            "Invalid HTTP status code: {code}"
        ))),
    }
}
