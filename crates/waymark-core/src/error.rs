//! Core error types for waymark.
//!
//! [`WaymarkError`] covers registration failures (invalid arguments, conflicting
//! or malformed routes), configuration problems, rendering failures, and the
//! HTTP-level outcomes the server adapter turns into responses.

use thiserror::Error;

/// The primary error type for waymark.
///
/// Registration errors are raised at the moment a route, redirect, block
/// pattern, or status handler is registered, never deferred to request time.
/// Each variant maps to an HTTP status code via [`WaymarkError::status_code`].
#[derive(Error, Debug)]
pub enum WaymarkError {
    // ── Registration ─────────────────────────────────────────────────

    /// A registration argument is out of range or otherwise unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A route was registered twice while duplicates are rejected.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A route template or router setup is malformed.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── HTTP ─────────────────────────────────────────────────────────

    /// HTTP 403 Forbidden.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// HTTP 404 Not Found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 500 Internal Server Error.
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Templates ────────────────────────────────────────────────────

    /// A view template failed to load or render.
    #[error("Template error: {0}")]
    TemplateError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WaymarkError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `InvalidArgument` -> 400
    /// - `Forbidden` -> 403
    /// - `NotFound` -> 404
    /// - `Conflict` -> 409
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::ImproperlyConfigured(_)
            | Self::InternalServerError(_)
            | Self::ConfigurationError(_)
            | Self::TemplateError(_)
            | Self::IoError(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, WaymarkError>`.
pub type WaymarkResult<T> = Result<T, WaymarkError>;
