//! # waymark-server
//!
//! Server layer for waymark. [`WaymarkApp`] serves a
//! [`Router`](waymark_http::Router) over Axum, and [`TeraRenderer`] renders
//! the templates behind view routes.

pub mod renderer;
pub mod server;

pub use renderer::TeraRenderer;
pub use server::WaymarkApp;
