// Source locations shared by the token tree, resolution errors and diagnostics.

use core::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn combine(a: &Span, b: &Span) -> Span {
        Span::new(a.start, b.end)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn str_of<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(s: pest::Span<'_>) -> Self {
        Self::new(s.start(), s.end())
    }
}
