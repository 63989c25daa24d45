//! # waymark-http
//!
//! HTTP layer for waymark. Provides the Request and Response types handed to
//! route handlers, and the [`urls`] routing core: path templates, the route
//! table, the block list, redirects, and status handlers.

pub mod method;
pub mod params;
pub mod request;
pub mod response;
pub mod urls;

use std::future::Future;
use std::pin::Pin;

pub use method::Method;
pub use params::RouteParams;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{HttpResponse, HttpResponseRedirect};
pub use urls::router::{Router, SharedRouter};

/// The future returned by a route handler.
pub type BoxFuture = Pin<Box<dyn Future<Output = HttpResponse> + Send>>;
