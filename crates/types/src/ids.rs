//! Newtype wrapper for block identifiers.

use std::fmt;
use std::sync::Arc;

/// Identifies a content block across measurement, pagination and rendering.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BlockId(Arc<str>);

impl BlockId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
