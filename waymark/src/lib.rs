//! # waymark
//!
//! Path-template routing for web applications: `users/{id}` and `page/{n?}`
//! templates matched in registration order, content-type prefixes
//! (`json:status`), wildcard block lists, exact-match redirects, and handlers
//! keyed by response status, served over Axum.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on the
//! individual crates for finer-grained control.

/// Settings, error types, and logging setup.
pub use waymark_core as core;

/// HTTP layer: Request, Response, and the router.
#[cfg(feature = "http")]
pub use waymark_http as http;

/// The Axum application and the Tera view renderer.
#[cfg(feature = "server")]
pub use waymark_server as server;

/// Re-exports of third-party crates for convenience.
pub mod deps {
    pub use axum;
    pub use serde;
    pub use serde_json;
    pub use tokio;
    pub use tracing;
    pub use tracing_subscriber;
}

/// Commonly used types.
///
/// ```
/// use waymark::prelude::*;
/// ```
pub mod prelude {
    pub use waymark_core::{Settings, WaymarkError, WaymarkResult};

    #[cfg(feature = "http")]
    pub use waymark_http::{
        BoxFuture, HttpRequest, HttpResponse, HttpResponseRedirect, Method, RouteParams, Router,
        SharedRouter,
    };

    #[cfg(feature = "server")]
    pub use waymark_server::{TeraRenderer, WaymarkApp};
}
