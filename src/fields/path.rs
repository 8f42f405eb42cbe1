//! Absolute path values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// The path separator character.
pub const SEPARATOR: char = '/';

/// An absolute path: non-empty and starting with `/`.
///
/// Used both for context paths and for prefixes. Ordering is plain string
/// order; the deepest-first ordering used for prefixes lives with the
/// pattern types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path(String);

impl Path {
    /// Creates a path, requiring it to be non-empty and absolute.
    pub fn new(path: impl Into<String>) -> Result<Self, FieldError> {
        let path = path.into();
        if path.is_empty() || !path.starts_with(SEPARATOR) {
            return Err(FieldError::InvalidPath(path));
        }
        Ok(Self(path))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Whether this is the root path `/`.
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path ends in a separator.
    pub fn ends_with_separator(&self) -> bool {
        self.0.ends_with(SEPARATOR)
    }

    /// The leading `end` bytes of this path as a new path.
    ///
    /// `end` must be non-zero, at most the path length, and on a character
    /// boundary; callers derive it from separator positions, which always
    /// satisfy that.
    pub fn prefix(&self, end: usize) -> Path {
        Path(self.0[..end].to_owned())
    }

    /// Number of separators in the path.
    pub fn separator_count(&self) -> usize {
        self.0.matches(SEPARATOR).count()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Path {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Path {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_and_empty() {
        assert!(Path::new("").is_err());
        assert!(Path::new("relative/path").is_err());
    }

    #[test]
    fn root_properties() {
        let root = Path::root();
        assert!(root.is_root());
        assert!(root.ends_with_separator());
        assert_eq!(root.separator_count(), 1);
    }

    #[test]
    fn prefix_keeps_separator() {
        let path = Path::new("/a/b/c").unwrap();
        assert_eq!(path.prefix(3).as_str(), "/a/");
        assert_eq!(path.prefix(1).as_str(), "/");
    }
}
