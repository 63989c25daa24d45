//! Captured route parameters.

use std::collections::HashMap;

/// Parameter values captured from a matched path, keyed by parameter name.
///
/// Each request carries its own `RouteParams`. Binding a match writes
/// name-by-name and never clears the store, so when one store receives several
/// matches, values from an earlier match survive until a later match binds the
/// same name.
///
/// # Examples
///
/// ```
/// use waymark_http::RouteParams;
///
/// let mut params = RouteParams::new();
/// params.insert("id", "42");
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: HashMap<String, String>,
}

impl RouteParams {
    /// Creates an empty parameter store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value bound to `name`.
    ///
    /// An optional parameter absent from the path is bound to `""`, so it
    /// reads as `Some("")` rather than `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` has been bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameters are bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a RouteParams {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites() {
        let mut params = RouteParams::new();
        params.insert("id", "1");
        params.insert("id", "2");
        assert_eq!(params.get("id"), Some("2"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_empty_value_is_present() {
        let mut params = RouteParams::new();
        params.insert("page", "");
        assert!(params.contains("page"));
        assert_eq!(params.get("page"), Some(""));
    }

    #[test]
    fn test_iter() {
        let mut params = RouteParams::new();
        params.insert("a", "1");
        params.insert("b", "2");
        let mut pairs: Vec<_> = params.iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}
