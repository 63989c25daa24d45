//! Settings for waymark.
//!
//! [`Settings`] holds everything the router and server adapter read at
//! startup: logging, the bind address, route-registration strictness, view
//! rendering, and block-list and redirect entries that can be declared in
//! configuration rather than code.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The status code used for redirects that do not name one.
pub const DEFAULT_REDIRECT_CODE: u16 = 301;

/// Controls how strictly route registration treats questionable input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Reject malformed route templates (optional segment not in final
    /// position, several optional segments, `*` in a route template, empty or
    /// unbalanced placeholders) instead of accepting them as written.
    pub strict_templates: bool,
    /// Fail when a route is registered for a path that already has one,
    /// instead of replacing the earlier entry.
    pub reject_duplicates: bool,
}

/// View rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Directories to load view templates from.
    pub template_dirs: Vec<PathBuf>,
    /// Default cache flag passed to the renderer by view routes.
    pub cache: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            template_dirs: vec![PathBuf::from("views")],
            cache: true,
        }
    }
}

/// A redirect declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectSettings {
    /// The path to redirect from.
    pub from: String,
    /// The path to redirect to.
    pub to: String,
    /// The redirect status code.
    #[serde(default = "default_redirect_code")]
    pub code: u16,
}

const fn default_redirect_code() -> u16 {
    DEFAULT_REDIRECT_CODE
}

/// The complete set of waymark settings.
///
/// # Examples
///
/// ```
/// use waymark_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.bind_address, "127.0.0.1:8000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The address the server adapter binds to.
    pub bind_address: String,

    // ── Routing ──────────────────────────────────────────────────────

    /// Route registration strictness.
    pub routing: RoutingSettings,
    /// Block-list patterns, registered in order at startup.
    pub blocked: Vec<String>,
    /// Redirects, registered in order at startup.
    pub redirects: Vec<RedirectSettings>,

    // ── Views ────────────────────────────────────────────────────────

    /// View rendering configuration.
    pub views: ViewSettings,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            bind_address: "127.0.0.1:8000".to_string(),
            routing: RoutingSettings::default(),
            blocked: Vec::new(),
            redirects: Vec::new(),
            views: ViewSettings::default(),
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.bind_address, "127.0.0.1:8000");
        assert_eq!(s.log_level, "info");
        assert!(s.blocked.is_empty());
        assert!(s.redirects.is_empty());
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_default_routing_is_lenient() {
        let s = Settings::default();
        assert!(!s.routing.strict_templates);
        assert!(!s.routing.reject_duplicates);
    }

    #[test]
    fn test_default_views() {
        let s = Settings::default();
        assert!(s.views.cache);
        assert_eq!(s.views.template_dirs, vec![PathBuf::from("views")]);
    }

    #[test]
    fn test_redirect_code_defaults_to_permanent() {
        let redirect: RedirectSettings =
            serde_json::from_str(r#"{"from": "old", "to": "new"}"#).unwrap();
        assert_eq!(redirect.code, 301);
    }
}
