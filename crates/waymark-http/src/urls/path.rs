//! Path normalization shared by every routing table.

use super::content_type::split_content_type;

/// Trims leading and trailing `/` from `path`.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Normalizes a registered path: strips a recognized content-type prefix, then
/// trims leading and trailing `/`.
///
/// Returns the normalized path and the content type the prefix selected.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::path::normalize;
///
/// assert_eq!(normalize("/users/{id}/"), ("users/{id}", "text/html"));
/// assert_eq!(normalize("json:/api/status"), ("api/status", "application/json"));
/// ```
pub fn normalize(raw: &str) -> (&str, &'static str) {
    let (rest, content_type) = split_content_type(raw);
    (trim_slashes(rest), content_type)
}

/// Splits a path on `/`, dropping empty segments.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::path::segments;
///
/// assert_eq!(segments("/a//b/"), vec!["a", "b"]);
/// assert!(segments("/").is_empty());
/// ```
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
