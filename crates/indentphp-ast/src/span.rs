use std::ops::Range;

use serde::Serialize;

/// A byte range in the source text together with the line it starts on.
///
/// Lines are 1-based; byte offsets are 0-based and `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
}

impl Span {
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 1,
    };

    pub fn new(start: u32, end: u32, line: u32) -> Self {
        Self { start, end, line }
    }

    pub fn range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Slice the covered text out of `source`.
    pub fn text(self, source: &str) -> &str {
        &source[self.range()]
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::DUMMY
    }
}
