//! Dotted field paths
//!
//! Input names such as `"userinfo.name"` address a location in a nested
//! [`ValueTree`](crate::ValueTree). A [`FieldPath`] is the parsed form: one or
//! more non-empty segments.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{FormError, Result};

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

/// A parsed, validated field path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[String; 4]>,
}

impl FieldPath {
    /// Parse a dotted name, rejecting empty segments
    pub fn parse(name: &str) -> Result<Self> {
        let mut segments = SmallVec::new();
        for segment in name.split(PATH_SEPARATOR) {
            if segment.is_empty() {
                return Err(FormError::InvalidPath {
                    path: name.to_string(),
                    reason: "empty path segment",
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// A single-segment path. `name` is taken verbatim, dots included.
    pub fn single(name: impl Into<String>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(name.into());
        Self { segments }
    }

    /// Path of a direct child of this one
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether the serialized name contained a separator
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Split into parent segments and the final segment
    pub fn split_last(&self) -> (&[String], &str) {
        let (last, parents) = self
            .segments
            .split_last()
            .map(|(last, parents)| (last.as_str(), parents))
            .unwrap_or(("", &[]));
        (parents, last)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        FieldPath::parse(s)
    }
}

/// Join raw segments with the path separator
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut joined = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            joined.push(PATH_SEPARATOR);
        }
        joined.push_str(segment.as_ref());
    }
    joined
}
