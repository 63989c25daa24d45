//! Exact-match redirects.
//!
//! Keys are compared as plain strings after normalization; `{...}` and `*`
//! have no special meaning here.

use std::collections::HashMap;

use http::StatusCode;

use waymark_core::settings::DEFAULT_REDIRECT_CODE;
use waymark_core::{RedirectSettings, WaymarkError, WaymarkResult};

use super::path;
use super::routes::parse_status;
use crate::{HttpResponse, HttpResponseRedirect};

/// A redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// The normalized destination path.
    pub destination: String,
    /// The redirect status code.
    pub code: StatusCode,
}

impl Redirect {
    /// Returns the `Location` value for this redirect: the destination as an
    /// absolute path.
    pub fn location(&self) -> String {
        format!("/{}", self.destination)
    }

    /// Builds the redirect response.
    pub fn to_response(&self) -> HttpResponse {
        HttpResponseRedirect::with_status(&self.location(), self.code)
    }
}

/// Redirects keyed by normalized source path.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::redirects::RedirectTable;
///
/// let mut redirects = RedirectTable::new();
/// redirects.register("/old", "/new", 301).unwrap();
///
/// let redirect = redirects.lookup("old").unwrap();
/// assert_eq!(redirect.destination, "new");
/// assert!(redirects.lookup("old/x").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    redirects: HashMap<String, Redirect>,
}

impl RedirectTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a redirect from `from` to `to`, replacing any earlier redirect
    /// from the same path.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::InvalidArgument`] if `code` is not a 3xx status.
    pub fn register(&mut self, from: &str, to: &str, code: u16) -> WaymarkResult<()> {
        let code = parse_status(code)?;
        if !code.is_redirection() {
            return Err(WaymarkError::InvalidArgument(format!(
                "Redirect status must be 3xx, got {}",
                code.as_u16()
            )));
        }
        let (source, _) = path::normalize(from);
        let (destination, _) = path::normalize(to);
        tracing::debug!(from = source, to = destination, code = code.as_u16(), "Registered redirect");
        self.redirects.insert(
            source.to_string(),
            Redirect {
                destination: destination.to_string(),
                code,
            },
        );
        Ok(())
    }

    /// Stores a `301 Moved Permanently` redirect.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches [`register`](Self::register).
    pub fn register_permanent(&mut self, from: &str, to: &str) -> WaymarkResult<()> {
        self.register(from, to, DEFAULT_REDIRECT_CODE)
    }

    /// Stores every redirect listed in settings.
    ///
    /// # Errors
    ///
    /// Fails on the first entry with an invalid code.
    pub fn register_all(&mut self, redirects: &[RedirectSettings]) -> WaymarkResult<()> {
        for redirect in redirects {
            self.register(&redirect.from, &redirect.to, redirect.code)?;
        }
        Ok(())
    }

    /// Returns the redirect registered for exactly `path`.
    pub fn lookup(&self, path: &str) -> Option<&Redirect> {
        self.redirects.get(path::trim_slashes(path))
    }

    /// Returns the number of redirects.
    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    /// Returns `true` if no redirects are registered.
    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_only() {
        let mut redirects = RedirectTable::new();
        redirects.register("old", "new", 301).unwrap();

        let redirect = redirects.lookup("old").unwrap();
        assert_eq!(redirect.destination, "new");
        assert_eq!(redirect.code, StatusCode::MOVED_PERMANENTLY);
        assert!(redirects.lookup("old/x").is_none());
        assert!(redirects.lookup("ol").is_none());
    }

    #[test]
    fn test_lookup_trims_slashes() {
        let mut redirects = RedirectTable::new();
        redirects.register("/old/", "new", 302).unwrap();
        assert!(redirects.lookup("/old").is_some());
    }

    #[test]
    fn test_register_normalizes_both_ends() {
        let mut redirects = RedirectTable::new();
        redirects.register("json:/a/", "plain:/b/c/", 307).unwrap();
        let redirect = redirects.lookup("a").unwrap();
        assert_eq!(redirect.destination, "b/c");
        assert_eq!(redirect.location(), "/b/c");
    }

    #[test]
    fn test_placeholders_are_plain_text() {
        let mut redirects = RedirectTable::new();
        redirects.register("users/{id}", "people", 301).unwrap();
        assert!(redirects.lookup("users/42").is_none());
        assert!(redirects.lookup("users/{id}").is_some());
    }

    #[test]
    fn test_register_overwrites() {
        let mut redirects = RedirectTable::new();
        redirects.register("old", "first", 301).unwrap();
        redirects.register("/old", "second", 308).unwrap();
        assert_eq!(redirects.len(), 1);
        let redirect = redirects.lookup("old").unwrap();
        assert_eq!(redirect.destination, "second");
        assert_eq!(redirect.code, StatusCode::PERMANENT_REDIRECT);
    }

    #[test]
    fn test_register_rejects_non_redirect_codes() {
        let mut redirects = RedirectTable::new();
        assert!(matches!(
            redirects.register("a", "b", 200),
            Err(WaymarkError::InvalidArgument(_))
        ));
        assert!(matches!(
            redirects.register("a", "b", 42),
            Err(WaymarkError::InvalidArgument(_))
        ));
        assert!(redirects.is_empty());
    }

    #[test]
    fn test_permanent_default() {
        let mut redirects = RedirectTable::new();
        redirects.register_permanent("a", "b").unwrap();
        assert_eq!(redirects.lookup("a").unwrap().code.as_u16(), 301);
    }

    #[test]
    fn test_to_response() {
        let redirect = Redirect {
            destination: "new".into(),
            code: StatusCode::FOUND,
        };
        let response = redirect.to_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(http::header::LOCATION).unwrap(), "/new");
    }

    #[test]
    fn test_register_all_from_settings() {
        let mut redirects = RedirectTable::new();
        let entries = vec![
            RedirectSettings {
                from: "a".into(),
                to: "b".into(),
                code: 301,
            },
            RedirectSettings {
                from: "c".into(),
                to: "d".into(),
                code: 302,
            },
        ];
        redirects.register_all(&entries).unwrap();
        assert_eq!(redirects.len(), 2);
    }
}
