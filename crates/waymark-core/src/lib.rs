//! # waymark-core
//!
//! Core types for the waymark router: errors, settings, and logging.
//! This crate has no HTTP dependencies and is shared by every other waymark crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Router and server settings with defaults
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{WaymarkError, WaymarkResult};
pub use settings::{RedirectSettings, RoutingSettings, Settings, ViewSettings};
