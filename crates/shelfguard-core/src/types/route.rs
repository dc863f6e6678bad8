//! Navigation route type.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// An application route such as `/my-books` or `/manage/42`.
///
/// Routes are absolute, use `/` as separator and carry no trailing slash
/// (except the root route itself). Query strings and fragments are not
/// part of a route.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Route(String);

impl Route {
    /// Create a route from a path, normalizing redundant slashes.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is relative or carries a query or
    /// fragment.
    pub fn new(path: impl AsRef<str>) -> Result<Self, Error> {
        let path = path.as_ref().trim();
        let invalid = |reason: &str| -> Error {
            InvalidInputError::Route {
                value: path.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if !path.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if path.contains(['?', '#']) {
            return Err(invalid("must not carry a query or fragment"));
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        Ok(Self(format!("/{}", segments.join("/"))))
    }

    /// Build a route from a literal that is already normalized.
    pub(crate) fn from_static(path: &'static str) -> Self {
        debug_assert!(path.starts_with('/') && (path == "/" || !path.ends_with('/')));
        Self(path.to_string())
    }

    /// The route's path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The route's non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Match this route against a pattern such as `/manage/:bookId`.
    ///
    /// Pattern segments starting with `:` match any single segment.
    pub fn matches(&self, pattern: &Route) -> bool {
        let mut ours = self.segments();
        let mut theirs = pattern.segments();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(seg), Some(pat)) => {
                    if !pat.starts_with(':') && seg != pat {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
