//! Hierarchical addresses
//!
//! A `PathAddress` is an ordered sequence of `PathSegment`s identifying a
//! location in the management tree. Addresses are immutable, compare by
//! structural equality, and are used both as the dispatch key into child
//! transformation nodes and as context passed to discard and rewrite
//! decisions.

use serde::{Deserialize, Serialize};

/// Value used by a segment that matches any value for its key
pub const WILDCARD_VALUE: &str = "*";

/// One (key, value) element of a hierarchical address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    key: String,
    value: String,
}

impl PathSegment {
    /// Create a segment from a key and a concrete value
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a wildcard segment matching any value for the given key
    pub fn wildcard(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: WILDCARD_VALUE.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check if this segment's value is the wildcard
    pub fn is_wildcard(&self) -> bool {
        self.value == WILDCARD_VALUE
    }

    /// Dispatch matching: keys must be equal, values equal or self wildcard
    ///
    /// Wildcard segments belong to transformation-node bindings; a concrete
    /// resource address never stores one.
    pub fn matches(&self, other: &PathSegment) -> bool {
        self.key == other.key && (self.is_wildcard() || self.value == other.value)
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// An ordered, immutable sequence of path segments
///
/// All constructors produce a new address; no method mutates in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PathAddress {
    segments: Vec<PathSegment>,
}

impl PathAddress {
    /// The empty (root) address
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build an address from an ordered list of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// A new address with `segment` appended
    pub fn append(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// The address of this address's parent, or None at the root
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The final segment, or None at the root
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl From<Vec<PathSegment>> for PathAddress {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl std::fmt::Display for PathAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
