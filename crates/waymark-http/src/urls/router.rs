//! The router: route table, block list, redirects, and status handlers.
//!
//! A [`Router`] is built with `&mut self` registration calls during startup
//! and then shared read-only, typically as `Arc<Router>`. Every lookup takes
//! `&self` and captures parameters into a store owned by the request being
//! served, so concurrent requests never see each other's values.
//!
//! When routes must change while requests are being served, wrap the router
//! in a [`SharedRouter`]: registration takes the write lock, lookups the read
//! lock.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use waymark_core::{RoutingSettings, Settings, WaymarkError, WaymarkResult};

use super::blocklist::BlockList;
use super::redirects::{Redirect, RedirectTable};
use super::routes::{ResolvedRoute, RouteEntry, RouteHandler, RouteTable};
use super::status::{StatusDispatcher, StatusHandler};
use super::view::{view_handler, ViewRenderer};
use crate::{HttpRequest, HttpResponse, Method, RouteParams};

/// Routing state for one application.
pub struct Router {
    routes: RouteTable,
    blocked: BlockList,
    redirects: RedirectTable,
    status: StatusDispatcher,
    renderer: Option<Arc<dyn ViewRenderer>>,
    view_cache: bool,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("blocked", &self.blocked)
            .field("redirects", &self.redirects)
            .field("status", &self.status)
            .field("has_renderer", &self.renderer.is_some())
            .field("view_cache", &self.view_cache)
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router with lenient registration.
    pub fn new() -> Self {
        Self::with_settings(RoutingSettings::default())
    }

    /// Creates an empty router with the given registration strictness.
    pub fn with_settings(settings: RoutingSettings) -> Self {
        Self {
            routes: RouteTable::with_settings(settings),
            blocked: BlockList::new(),
            redirects: RedirectTable::new(),
            status: StatusDispatcher::new(),
            renderer: None,
            view_cache: true,
        }
    }

    /// Creates a router from application settings, registering the block
    /// patterns and redirects they declare.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::InvalidArgument`] if a configured redirect has
    /// a non-3xx code.
    pub fn from_settings(settings: &Settings) -> WaymarkResult<Self> {
        let mut router = Self::with_settings(settings.routing.clone());
        router.view_cache = settings.views.cache;
        for pattern in &settings.blocked {
            router.block(pattern);
        }
        router.redirects.register_all(&settings.redirects)?;
        Ok(router)
    }

    // ── Registration ────────────────────────────────────────────────

    /// Registers `handler` for `path` and `method`, with an optional status
    /// override applied to handler responses whose status was not chosen
    /// explicitly (see [`ResolvedRoute::apply`]).
    ///
    /// See [`RouteTable::register`] for normalization and duplicate handling.
    ///
    /// # Errors
    ///
    /// Fails on an invalid status code, and for malformed templates or
    /// duplicate paths when the router is configured to reject them.
    pub fn register(
        &mut self,
        path: &str,
        method: Method,
        handler: RouteHandler,
        status: Option<u16>,
    ) -> WaymarkResult<()> {
        self.routes.register(path, method, handler, status)
    }

    /// Registers a GET route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn get(&mut self, path: &str, handler: RouteHandler) -> WaymarkResult<()> {
        self.register(path, Method::Get, handler, None)
    }

    /// Registers a POST route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn post(&mut self, path: &str, handler: RouteHandler) -> WaymarkResult<()> {
        self.register(path, Method::Post, handler, None)
    }

    /// Registers a PUT route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn put(&mut self, path: &str, handler: RouteHandler) -> WaymarkResult<()> {
        self.register(path, Method::Put, handler, None)
    }

    /// Registers a PATCH route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn patch(&mut self, path: &str, handler: RouteHandler) -> WaymarkResult<()> {
        self.register(path, Method::Patch, handler, None)
    }

    /// Registers a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn delete(&mut self, path: &str, handler: RouteHandler) -> WaymarkResult<()> {
        self.register(path, Method::Delete, handler, None)
    }

    /// Registers a route that serves every method.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn any(&mut self, path: &str, handler: RouteHandler) -> WaymarkResult<()> {
        self.register(path, Method::Any, handler, None)
    }

    /// Sets the renderer used by [`view`](Self::view) routes.
    pub fn set_renderer(&mut self, renderer: Arc<dyn ViewRenderer>) {
        self.renderer = Some(renderer);
    }

    /// Sets the cache flag view routes registered after this call use when
    /// [`view`](Self::view) is given no explicit flag.
    pub fn set_view_cache(&mut self, cache: bool) {
        self.view_cache = cache;
    }

    /// Registers a GET route that renders `view` with `data`.
    ///
    /// `cache` is passed to the renderer on every request; `None` uses the
    /// router default (`views.cache` in settings, or
    /// [`set_view_cache`](Self::set_view_cache)).
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::ImproperlyConfigured`] if no renderer has been
    /// set, plus anything [`register`](Self::register) can return.
    pub fn view(
        &mut self,
        path: &str,
        view: &str,
        data: Value,
        cache: Option<bool>,
    ) -> WaymarkResult<()> {
        let renderer = self.renderer.clone().ok_or_else(|| {
            WaymarkError::ImproperlyConfigured(format!(
                "View route '{path}' needs a renderer; call set_renderer first"
            ))
        })?;
        let cache = cache.unwrap_or(self.view_cache);
        let handler = view_handler(renderer, view, data, cache);
        self.register(path, Method::Get, handler, None)
    }

    /// Registers a handler run for responses with status `code`.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::InvalidArgument`] for an invalid status code.
    pub fn on_status(&mut self, code: u16, handler: StatusHandler) -> WaymarkResult<()> {
        self.status.register(code, handler)
    }

    /// Blocks paths matching `pattern` (`*` matches the rest of the path).
    pub fn block(&mut self, pattern: &str) {
        self.blocked.block(pattern);
    }

    /// Redirects `from` to `to` with status `code`.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::InvalidArgument`] if `code` is not a 3xx status.
    pub fn redirect(&mut self, from: &str, to: &str, code: u16) -> WaymarkResult<()> {
        self.redirects.register(from, to, code)
    }

    /// Redirects `from` to `to` with `301 Moved Permanently`.
    ///
    /// # Errors
    ///
    /// See [`redirect`](Self::redirect).
    pub fn redirect_permanent(&mut self, from: &str, to: &str) -> WaymarkResult<()> {
        self.redirects.register_permanent(from, to)
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Finds the route for `path` and `method`.
    ///
    /// The result carries the handler, a fresh parameter store holding the
    /// captured values, and the route's content type and status override.
    /// `None` means no route matched; answering with a 404 is up to the
    /// caller.
    pub fn resolve(&self, path: &str, method: &http::Method) -> Option<ResolvedRoute> {
        let mut params = RouteParams::new();
        let Some(entry) = self.routes.lookup(path, method, &mut params) else {
            tracing::debug!(path, method = %method, "No route matched");
            return None;
        };
        tracing::debug!(path, method = %method, route = entry.path(), "Route matched");
        Some(ResolvedRoute {
            route: entry.path().to_string(),
            handler: entry.handler().clone(),
            params,
            content_type: entry.content_type(),
            status: entry.status(),
        })
    }

    /// Finds the route for `path` and `method`, binding captured values into
    /// the caller's `params`.
    ///
    /// `params` is only written on a match, and only for the names the
    /// matched template declares; other entries are left as they were.
    pub fn resolve_into(
        &self,
        path: &str,
        method: &http::Method,
        params: &mut RouteParams,
    ) -> Option<&RouteEntry> {
        self.routes.lookup(path, method, params)
    }

    /// Returns `true` if a route with the same shape as `path` is registered.
    pub fn exists(&self, path: &str) -> bool {
        self.routes.exists(path)
    }

    /// Returns `true` if `path` is blocked.
    pub fn is_blocked(&self, path: &str) -> bool {
        self.blocked.is_blocked(path)
    }

    /// Returns the redirect registered for exactly `path`.
    pub fn lookup_redirect(&self, path: &str) -> Option<&Redirect> {
        self.redirects.lookup(path)
    }

    /// Runs the status handler for the response's current status, if any.
    ///
    /// Returns `true` if a handler ran.
    pub fn dispatch_status(&self, request: &HttpRequest, response: &mut HttpResponse) -> bool {
        self.status.dispatch(response.status(), request, response)
    }

    /// Returns `true` if any status handler is registered.
    pub fn has_status_handlers(&self) -> bool {
        !self.status.is_empty()
    }

    /// Returns the route table.
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

/// A [`Router`] that can be modified while it is serving requests.
///
/// Cloning shares the same router.
#[derive(Clone, Default)]
pub struct SharedRouter {
    inner: Arc<RwLock<Router>>,
}

impl std::fmt::Debug for SharedRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedRouter").field(&*self.read()).finish()
    }
}

impl From<Router> for SharedRouter {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

impl SharedRouter {
    /// Wraps `router` for shared use.
    pub fn new(router: Router) -> Self {
        Self {
            inner: Arc::new(RwLock::new(router)),
        }
    }

    /// Locks the router for lookups.
    ///
    /// A lock poisoned by a panicking writer is recovered; registration never
    /// leaves the tables half-updated.
    pub fn read(&self) -> RwLockReadGuard<'_, Router> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the router for registration.
    pub fn write(&self) -> RwLockWriteGuard<'_, Router> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a route under the write lock.
    ///
    /// # Errors
    ///
    /// See [`Router::register`].
    pub fn register(
        &self,
        path: &str,
        method: Method,
        handler: RouteHandler,
        status: Option<u16>,
    ) -> WaymarkResult<()> {
        self.write().register(path, method, handler, status)
    }

    /// Resolves a route under the read lock.
    pub fn resolve(&self, path: &str, method: &http::Method) -> Option<ResolvedRoute> {
        self.read().resolve(path, method)
    }

    /// Checks the block list under the read lock.
    pub fn is_blocked(&self, path: &str) -> bool {
        self.read().is_blocked(path)
    }

    /// Looks up a redirect under the read lock.
    pub fn lookup_redirect(&self, path: &str) -> Option<Redirect> {
        self.read().lookup_redirect(path).cloned()
    }

    /// Checks for a route shape under the read lock.
    pub fn exists(&self, path: &str) -> bool {
        self.read().exists(path)
    }
}
