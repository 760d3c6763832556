//! `LabelRange`: a half-open run of consecutive entity indices.
//!
//! Boundary patches are addressed as a `LabelRange` of face ids. The textual
//! form is `(start size)`, matching how patch extents are usually printed in
//! mesh diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// `start .. start + size`. Ordered by `start`, then `size`.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LabelRange {
    start: usize,
    size: usize,
}

impl LabelRange {
    #[inline]
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// Range covering `start..end` (empty if `end <= start`).
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self::new(start, end.saturating_sub(start))
    }

    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// One past the last index.
    #[inline]
    pub const fn end_value(&self) -> usize {
        self.start + self.size
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Last index, if any.
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end_value() - 1)
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        i >= self.start && i < self.end_value()
    }

    /// Translate a global index into this range's local numbering.
    #[inline]
    pub fn local(&self, i: usize) -> Option<usize> {
        self.contains(i).then(|| i - self.start)
    }

    /// `true` if both ranges share at least one index. With `touches`, ranges
    /// that merely abut also count.
    pub fn overlaps(&self, other: &Self, touches: bool) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let slack = usize::from(touches);
        self.start <= other.end_value() - 1 + slack && other.start <= self.end_value() - 1 + slack
    }

    /// Smallest range covering both. Empty operands are ignored.
    pub fn join(&self, other: &Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => *other,
            (_, true) => *self,
            _ => Self::from_bounds(
                self.start.min(other.start),
                self.end_value().max(other.end_value()),
            ),
        }
    }

    /// Intersection (possibly empty, positioned at the larger start).
    pub fn subset(&self, other: &Self) -> Self {
        let start = self.start.max(other.start);
        let end = self.end_value().min(other.end_value());
        Self::from_bounds(start, end)
    }

    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end_value()
    }

    pub fn iter(&self) -> Range<usize> {
        self.as_range()
    }
}

impl IntoIterator for LabelRange {
    type Item = usize;
    type IntoIter = Range<usize>;
    fn into_iter(self) -> Range<usize> {
        self.as_range()
    }
}

impl From<Range<usize>> for LabelRange {
    fn from(r: Range<usize>) -> Self {
        Self::from_bounds(r.start, r.end)
    }
}

impl fmt::Display for LabelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.start, self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse label range from `{0}`; expected `(start size)`")]
pub struct ParseLabelRangeError(String);

impl FromStr for LabelRange {
    type Err = ParseLabelRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseLabelRangeError(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(err)?;
        let mut parts = inner.split_whitespace();
        let start = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let size = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::new(start, size))
    }
}
