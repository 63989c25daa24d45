//! URL routing.
//!
//! - [`content_type`]: the `json:`, `csv:`, ... prefixes and the types they select
//! - [`path`]: path normalization and segmenting
//! - [`pattern`]: route templates (`users/{id}`, `page/{n?}`) and matching
//! - [`routes`]: the route table, first match wins in registration order
//! - [`blocklist`]: wildcard patterns for paths that must be refused
//! - [`redirects`]: exact-match redirects
//! - [`status`]: handlers run for a response status after dispatch
//! - [`view`]: routes answered by rendering a template
//! - [`router`]: the [`Router`](router::Router) tying them together
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use waymark_http::{HttpRequest, HttpResponse, Router};
//!
//! let mut router = Router::new();
//! router
//!     .get("users/{id}", Arc::new(|_req: HttpRequest| -> waymark_http::BoxFuture {
//!         Box::pin(async { HttpResponse::ok("user") })
//!     }))
//!     .unwrap();
//!
//! let resolved = router.resolve("/users/42", &http::Method::GET).unwrap();
//! assert_eq!(resolved.params.get("id"), Some("42"));
//! assert!(router.resolve("/users", &http::Method::GET).is_none());
//! ```

pub mod blocklist;
pub mod content_type;
pub mod path;
pub mod pattern;
pub mod redirects;
pub mod router;
pub mod routes;
pub mod status;
pub mod view;
