use std::ops::Range;

/// A byte range `[start, end)` into the document body.
///
/// Nodes that carry raw source (code, HTML) store spans rather than copied
/// text; resolving a span against the body reproduces the exact source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

/// A span that does not index validly into the buffer it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("span {start}..{end} does not index into a {len}-byte source")]
pub struct SpanOutOfBounds {
    pub start: usize,
    pub end: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes; zero for an inverted span.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Slices `source` with this span.
    ///
    /// Fails when the span runs past the end of `source`, is inverted, or
    /// does not fall on UTF-8 character boundaries.
    pub fn resolve(self, source: &str) -> Result<&str, SpanOutOfBounds> {
        source.get(self.start..self.end).ok_or(SpanOutOfBounds {
            start: self.start,
            end: self.end,
            len: source.len(),
        })
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}
