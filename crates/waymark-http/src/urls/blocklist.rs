//! Blocked path patterns.
//!
//! A block pattern is a path whose segments are literals or the `*` wildcard.
//! Matching walks the pattern and the path side by side and succeeds as soon
//! as it reaches a wildcard, so `admin/*` blocks `admin/x` and `admin/x/y` but
//! not bare `admin`: the walk never gets to index 1.

use std::fmt;

use super::path;

/// A segment of a block pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSegment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// `*`: blocks everything from this position on.
    Wildcard,
}

impl BlockSegment {
    fn parse(text: &str) -> Self {
        if text == "*" {
            Self::Wildcard
        } else {
            Self::Literal(text.to_string())
        }
    }
}

impl fmt::Display for BlockSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// An ordered list of block patterns.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::blocklist::BlockList;
///
/// let mut blocked = BlockList::new();
/// blocked.block("admin/*");
/// assert!(blocked.is_blocked("admin/settings"));
/// assert!(!blocked.is_blocked("admin"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    patterns: Vec<Vec<BlockSegment>>,
}

impl BlockList {
    /// Creates an empty block list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pattern. Duplicates are kept.
    pub fn block(&mut self, raw_path: &str) {
        let (normalized, _) = path::normalize(raw_path);
        let pattern = path::segments(normalized)
            .into_iter()
            .map(BlockSegment::parse)
            .collect();
        tracing::debug!(pattern = normalized, "Blocked path pattern");
        self.patterns.push(pattern);
    }

    /// Returns `true` if any pattern blocks `path`.
    pub fn is_blocked(&self, path: &str) -> bool {
        let current = path::segments(path);
        self.patterns
            .iter()
            .any(|pattern| Self::blocks(pattern, &current))
    }

    fn blocks(pattern: &[BlockSegment], current: &[&str]) -> bool {
        let last_pattern = pattern.len().wrapping_sub(1);
        let last_current = current.len().wrapping_sub(1);

        for (i, (segment, value)) in pattern.iter().zip(current).enumerate() {
            match segment {
                BlockSegment::Wildcard => return true,
                BlockSegment::Literal(text) if text != value => return false,
                BlockSegment::Literal(_) => {}
            }
            if i == last_pattern && i == last_current {
                return true;
            }
        }
        false
    }

    /// Returns the number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if nothing is blocked.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
