//! Route template parsing, matching, and parameter binding.
//!
//! A template such as `users/{id}/posts/{page?}` is parsed once, at
//! registration, into a [`RoutePattern`] of classified [`Segment`]s:
//!
//! | Template | Segment |
//! |----------|---------|
//! | `users`  | [`Segment::Literal`] |
//! | `{id}`   | [`Segment::Required`] |
//! | `{page?}`| [`Segment::Optional`] |
//!
//! Matching compares segment by segment. A literal must equal the path
//! segment; a parameter accepts any single segment. An optional parameter may
//! be left out only when it is the final segment of the template.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use waymark_core::{WaymarkError, WaymarkResult};

use crate::params::RouteParams;

/// One `/`-delimited component of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must appear verbatim.
    Literal(String),
    /// `{name}`: any single segment, captured under `name`.
    Required(String),
    /// `{name?}`: like [`Segment::Required`], but may be absent when last.
    Optional(String),
}

impl Segment {
    /// Classifies one raw template segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use waymark_http::urls::pattern::Segment;
    ///
    /// assert_eq!(Segment::parse("users"), Segment::Literal("users".into()));
    /// assert_eq!(Segment::parse("{id}"), Segment::Required("id".into()));
    /// assert_eq!(Segment::parse("{id?}"), Segment::Optional("id".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(inner) => inner.strip_suffix('?').map_or_else(
                || Self::Required(inner.to_string()),
                |name| Self::Optional(name.to_string()),
            ),
            None => Self::Literal(raw.to_string()),
        }
    }

    /// Returns `true` for required and optional parameters.
    pub const fn is_param(&self) -> bool {
        matches!(self, Self::Required(_) | Self::Optional(_))
    }

    /// Returns `true` for an optional parameter.
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns `true` if this segment accepts the path segment `current`.
    fn accepts(&self, current: &str) -> bool {
        match self {
            Self::Literal(text) => text == current,
            Self::Required(_) | Self::Optional(_) => true,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Required(name) => write!(f, "{{{name}}}"),
            Self::Optional(name) => write!(f, "{{{name}?}}"),
        }
    }
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses a normalized template (content-type prefix and outer slashes
    /// already removed). Empty segments are dropped.
    ///
    /// Parsing never fails: malformed templates are kept as written and
    /// behave as whichever matching rule applies. Use
    /// [`validate`](Self::validate) to reject them.
    pub fn parse(template: &str) -> Self {
        Self {
            segments: super::path::segments(template)
                .into_iter()
                .map(Segment::parse)
                .collect(),
        }
    }

    /// Returns the classified segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Checks the template against the rules matching relies on.
    ///
    /// Rejects an optional parameter anywhere but the final segment (which also
    /// rules out more than one), a `*` segment, a placeholder with an empty
    /// name, and a segment with stray braces.
    pub fn validate(&self) -> WaymarkResult<()> {
        let last = self.segments.len().saturating_sub(1);
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Optional(_) if i != last => {
                    return Err(malformed(self, "an optional parameter must be the final segment"));
                }
                Segment::Required(name) | Segment::Optional(name) if !is_param_name(name) => {
                    return Err(malformed(self, &format!("invalid parameter name '{name}'")));
                }
                Segment::Literal(text) if text == "*" => {
                    return Err(malformed(self, "wildcards are only allowed in block patterns"));
                }
                Segment::Literal(text) if text.contains(['{', '}']) => {
                    return Err(malformed(self, &format!("unbalanced braces in '{text}'")));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Tests the path segments `current` against this pattern.
    ///
    /// Walks both sequences in step. A literal that differs from the path
    /// segment ends the walk with no match. The walk succeeds when it reaches
    /// the last index of both sequences together, or when it reaches the end
    /// of the path one short of the pattern and the pattern's final segment is
    /// optional. Two empty sequences match.
    ///
    /// # Examples
    ///
    /// ```
    /// use waymark_http::urls::pattern::RoutePattern;
    ///
    /// let pattern = RoutePattern::parse("users/{id?}");
    /// assert!(pattern.matches(&["users", "42"]));
    /// assert!(pattern.matches(&["users"]));
    /// assert!(!pattern.matches(&["users", "42", "edit"]));
    /// ```
    pub fn matches(&self, current: &[&str]) -> bool {
        let pattern = &self.segments;
        if pattern.is_empty() && current.is_empty() {
            return true;
        }

        let last_pattern = pattern.len().wrapping_sub(1);
        let last_current = current.len().wrapping_sub(1);

        for (i, (segment, value)) in pattern.iter().zip(current).enumerate() {
            if !segment.accepts(value) {
                return false;
            }
            if i == last_pattern && i == last_current {
                return true;
            }
            if i + 1 == last_pattern && pattern[i + 1].is_optional() && i == last_current {
                return true;
            }
        }
        false
    }

    /// Writes the captured values of a successful match into `params`.
    ///
    /// Required parameters take the path segment at their position. An
    /// optional parameter takes its segment when present and `""` otherwise.
    /// Existing entries in `params` are overwritten by name and never removed.
    pub fn bind(&self, current: &[&str], params: &mut RouteParams) {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(_) => {}
                Segment::Required(name) => {
                    if let Some(value) = current.get(i) {
                        params.insert(name.as_str(), *value);
                    }
                }
                Segment::Optional(name) => {
                    params.insert(name.as_str(), current.get(i).copied().unwrap_or(""));
                }
            }
        }
    }

    /// Returns the template with every placeholder collapsed to `{}`.
    ///
    /// Two templates with the same shape collapse to the same string no
    /// matter what their parameters are called.
    pub fn shape(template: &str) -> String {
        placeholder_regex().replace_all(template, "{}").into_owned()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{[^{}/]*\}").expect("valid regex"))
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['{', '}', '?'])
}

fn malformed(pattern: &RoutePattern, reason: &str) -> WaymarkError {
    WaymarkError::ImproperlyConfigured(format!("Malformed route template '{pattern}': {reason}"))
}
