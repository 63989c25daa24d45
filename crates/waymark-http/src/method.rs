//! The method a route is registered for.

use std::fmt;
use std::str::FromStr;

use waymark_core::WaymarkError;

/// The HTTP method a route accepts.
///
/// [`Method::Any`] accepts every incoming method, including ones without a
/// named variant here (`HEAD`, `OPTIONS`, extension methods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Any,
}

impl Method {
    /// Returns the upper-case method name (`"ANY"` for [`Method::Any`]).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Any => "ANY",
        }
    }

    /// Returns `true` if a route registered for `self` serves `current`.
    ///
    /// # Examples
    ///
    /// ```
    /// use waymark_http::Method;
    ///
    /// assert!(Method::Get.accepts(&http::Method::GET));
    /// assert!(!Method::Get.accepts(&http::Method::POST));
    /// assert!(Method::Any.accepts(&http::Method::OPTIONS));
    /// ```
    pub fn accepts(self, current: &http::Method) -> bool {
        match self {
            Self::Any => true,
            _ => self.as_str() == current.as_str(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = WaymarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "ANY" | "*" => Ok(Self::Any),
            other => Err(WaymarkError::InvalidArgument(format!(
                "Unsupported route method: {other}"
            ))),
        }
    }
}
