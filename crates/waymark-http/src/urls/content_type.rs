//! Content-type prefixes on route paths.
//!
//! A route path may start with a short prefix naming the content type of its
//! responses, e.g. `json:api/status`. The prefix is stripped when the route is
//! registered and the content type stored with the route.

/// The content type of routes registered without a prefix.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Recognized prefixes, checked in this order; the first match wins.
pub const CONTENT_TYPE_PREFIXES: [(&str, &str); 5] = [
    ("csv:", "text/csv"),
    ("json:", "application/json"),
    ("pdf:", "application/pdf"),
    ("plain:", "text/plain"),
    ("xml:", "application/xml"),
];

/// Splits a recognized content-type prefix off `raw`.
///
/// Returns the rest of the path and the content type, or `raw` unchanged
/// with [`DEFAULT_CONTENT_TYPE`] when no prefix matches.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::content_type::split_content_type;
///
/// assert_eq!(split_content_type("json:status"), ("status", "application/json"));
/// assert_eq!(split_content_type("status"), ("status", "text/html"));
/// ```
pub fn split_content_type(raw: &str) -> (&str, &'static str) {
    CONTENT_TYPE_PREFIXES
        .iter()
        .find_map(|(prefix, content_type)| {
            raw.strip_prefix(prefix).map(|rest| (rest, *content_type))
        })
        .unwrap_or((raw, DEFAULT_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_prefix() {
        assert_eq!(split_content_type("csv:export"), ("export", "text/csv"));
        assert_eq!(split_content_type("json:api"), ("api", "application/json"));
        assert_eq!(split_content_type("pdf:invoice/{id}"), ("invoice/{id}", "application/pdf"));
        assert_eq!(split_content_type("plain:robots.txt"), ("robots.txt", "text/plain"));
        assert_eq!(split_content_type("xml:sitemap"), ("sitemap", "application/xml"));
    }

    #[test]
    fn test_only_first_prefix_is_stripped() {
        assert_eq!(split_content_type("json:xml:feed"), ("xml:feed", "application/json"));
    }

    #[test]
    fn test_prefix_must_lead() {
        assert_eq!(split_content_type("/json:feed"), ("/json:feed", "text/html"));
        assert_eq!(split_content_type("api/json:feed"), ("api/json:feed", "text/html"));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(split_content_type("JSON:feed"), ("JSON:feed", "text/html"));
    }
}
