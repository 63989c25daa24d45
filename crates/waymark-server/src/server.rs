//! HTTP server integration for waymark.
//!
//! [`WaymarkApp`] puts a [`Router`] behind Axum. Every request goes through
//! the same pipeline:
//!
//! 1. a blocked path is answered with `403 Forbidden`;
//! 2. a redirected path is answered with its stored code and
//!    `Location: /<destination>`;
//! 3. a matched route runs its handler with the captured parameters, and the
//!    route's content type and status override are applied;
//! 4. anything else is `404 Not Found`.
//!
//! The status handler for the final response status then gets a chance to
//! rewrite the response.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use waymark_core::Settings;
//! use waymark_http::{HttpRequest, HttpResponse, Router};
//! use waymark_server::server::WaymarkApp;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.get("/", Arc::new(|_req: HttpRequest| -> waymark_http::BoxFuture {
//!     Box::pin(async { HttpResponse::ok("Hello!") })
//! }))?;
//!
//! let app = WaymarkApp::new(Settings::default()).router(router);
//! // app.run("0.0.0.0:8000").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::response::IntoResponse;
use axum::routing::any;
use tracing::Instrument;

use waymark_core::logging::request_span;
use waymark_core::{Settings, WaymarkError, WaymarkResult};
use waymark_http::urls::redirects::Redirect;
use waymark_http::urls::routes::ResolvedRoute;
use waymark_http::{HttpRequest, HttpResponse, Router, SharedRouter};

/// Where the application reads its routing tables from.
#[derive(Clone)]
enum Routes {
    /// Built once, read-only while serving.
    Frozen(Arc<Router>),
    /// Open to registration while serving.
    Shared(SharedRouter),
}

impl Routes {
    fn read<R>(&self, f: impl FnOnce(&Router) -> R) -> R {
        match self {
            Self::Frozen(router) => f(router),
            Self::Shared(shared) => f(&shared.read()),
        }
    }
}

/// What the routing tables decided for a request, before any handler runs.
enum Outcome {
    Blocked,
    Redirect(Redirect),
    Route(ResolvedRoute),
    NotFound,
}

/// The main application type for waymark.
///
/// `WaymarkApp` combines a router and settings into an application that can
/// be converted to an Axum router or run directly as an HTTP server.
pub struct WaymarkApp {
    routes: Routes,
    settings: Settings,
}

impl WaymarkApp {
    /// Creates a new `WaymarkApp` with an empty router.
    pub fn new(settings: Settings) -> Self {
        Self {
            routes: Routes::Frozen(Arc::new(Router::new())),
            settings,
        }
    }

    /// Creates a new `WaymarkApp` whose router carries the block patterns and
    /// redirects declared in `settings`.
    ///
    /// # Errors
    ///
    /// See [`Router::from_settings`].
    pub fn from_settings(settings: Settings) -> WaymarkResult<Self> {
        let router = Router::from_settings(&settings)?;
        Ok(Self::new(settings).router(router))
    }

    /// Serves `router`, frozen: no registration once the app is built.
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.routes = Routes::Frozen(Arc::new(router));
        self
    }

    /// Serves a [`SharedRouter`], which may still be modified through other
    /// clones while requests are handled.
    #[must_use]
    pub fn shared_router(mut self, router: SharedRouter) -> Self {
        self.routes = Routes::Shared(router);
        self
    }

    /// Returns a reference to the application settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.read(|router| router.routes().len())
    }

    /// Runs one request through the routing pipeline.
    pub async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let mut status_request = self
            .routes
            .read(Router::has_status_handlers)
            .then(|| request.clone());

        let mut response = self.respond(request, status_request.as_mut()).await;

        if let Some(request) = status_request {
            let handled = self
                .routes
                .read(|router| router.dispatch_status(&request, &mut response));
            if handled {
                tracing::debug!(status = response.status().as_u16(), "Status handler ran");
            }
        }
        tracing::debug!(status = response.status().as_u16(), "Request finished");
        response
    }

    /// Produces the pipeline response, binding the matched route's params on
    /// `status_request` so status handlers can read them.
    async fn respond(
        &self,
        request: HttpRequest,
        status_request: Option<&mut HttpRequest>,
    ) -> HttpResponse {
        let outcome = self.routes.read(|router| {
            let path = request.path();
            if router.is_blocked(path) {
                Outcome::Blocked
            } else if let Some(redirect) = router.lookup_redirect(path) {
                Outcome::Redirect(redirect.clone())
            } else if let Some(resolved) = router.resolve(path, request.method()) {
                Outcome::Route(resolved)
            } else {
                Outcome::NotFound
            }
        });

        match outcome {
            Outcome::Blocked => {
                tracing::info!(path = request.path(), "Blocked request");
                HttpResponse::forbidden("Forbidden")
            }
            Outcome::Redirect(redirect) => {
                tracing::debug!(
                    to = redirect.destination.as_str(),
                    code = redirect.code.as_u16(),
                    "Redirecting"
                );
                redirect.to_response()
            }
            Outcome::Route(resolved) => {
                if let Some(status_request) = status_request {
                    status_request.set_params(resolved.params.clone());
                }
                resolved.call(request).await
            }
            Outcome::NotFound => HttpResponse::not_found("Not Found"),
        }
    }

    /// Converts the application into an Axum router.
    ///
    /// Every path and method is handed to [`dispatch`](Self::dispatch).
    pub fn into_axum_router(self) -> axum::Router {
        let app = Arc::new(self);

        let handler = move |req: Request<Body>| {
            let app = Arc::clone(&app);

            async move {
                let (parts, body) = req.into_parts();
                let body_bytes = axum::body::to_bytes(body, usize::MAX)
                    .await
                    .unwrap_or_default()
                    .to_vec();

                let request = HttpRequest::from_axum(parts, body_bytes);
                let span = request_span(request.method().as_str(), request.path());
                app.dispatch(request).instrument(span).await.into_response()
            }
        };

        axum::Router::new()
            .route("/{*path}", any(handler.clone()))
            .route("/", any(handler))
    }

    /// Runs the application as an HTTP server on the given address.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the address or
    /// encounters a runtime error.
    pub async fn run(self, addr: &str) -> WaymarkResult<()> {
        let debug = self.settings.debug;
        let router = self.into_axum_router();
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            WaymarkError::ImproperlyConfigured(format!("Failed to bind to {addr}: {e}"))
        })?;

        if debug {
            tracing::info!("Starting development server at http://{addr}/");
        }

        axum::serve(listener, router)
            .await
            .map_err(|e| WaymarkError::InternalServerError(format!("Server error: {e}")))?;

        Ok(())
    }

    /// Runs the application on [`Settings::bind_address`].
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn serve(self) -> WaymarkResult<()> {
        let addr = self.settings.bind_address.clone();
        self.run(&addr).await
    }
}

impl std::fmt::Debug for WaymarkApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaymarkApp")
            .field("route_count", &self.route_count())
            .field("shared", &matches!(self.routes, Routes::Shared(_)))
            .field("debug", &self.settings.debug)
            .finish()
    }
}
