//! Handlers keyed by response status.
//!
//! After the main handler has produced a response, the server passes it here.
//! A handler registered for that status may rewrite the body or headers (a
//! custom 404 page, say); the dispatcher itself never changes the status.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;

use waymark_core::WaymarkResult;

use super::routes::parse_status;
use crate::{HttpRequest, HttpResponse};

/// A handler invoked for responses with a given status.
pub type StatusHandler = Arc<dyn Fn(&HttpRequest, &mut HttpResponse) + Send + Sync>;

/// Status code to handler mapping.
#[derive(Clone, Default)]
pub struct StatusDispatcher {
    handlers: HashMap<u16, StatusHandler>,
}

impl fmt::Debug for StatusDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<_> = self.handlers.keys().collect();
        codes.sort_unstable();
        f.debug_struct("StatusDispatcher")
            .field("codes", &codes)
            .finish()
    }
}

impl StatusDispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `code`, replacing any earlier handler.
    ///
    /// # Errors
    ///
    /// Returns [`waymark_core::WaymarkError::InvalidArgument`] if `code` is
    /// not a valid HTTP status code.
    pub fn register(&mut self, code: u16, handler: StatusHandler) -> WaymarkResult<()> {
        let code = parse_status(code)?.as_u16();
        tracing::debug!(code, "Registered status handler");
        self.handlers.insert(code, handler);
        Ok(())
    }

    /// Invokes the handler registered for `status`, if any.
    ///
    /// Returns `true` if a handler ran.
    pub fn dispatch(
        &self,
        status: StatusCode,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> bool {
        let Some(handler) = self.handlers.get(&status.as_u16()) else {
            return false;
        };
        handler(request, response);
        true
    }

    /// Returns `true` if a handler is registered for `code`.
    pub fn contains(&self, code: u16) -> bool {
        self.handlers.contains_key(&code)
    }

    /// Returns `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
