//! Contiguous spans of recognized characters considered as matcher
//! candidates.

use formscan_recognition::{Character, Line, RectF};

/// A contiguous span of characters within one recognized line.
///
/// Holds `lines[line][pos .. pos + len]`; text and bounding rectangle
/// are computed on demand. `pos + len` never exceeds the line's length.
#[derive(Debug, Clone, Copy)]
pub struct Range<'a> {
    lines: &'a [Line],
    line: usize,
    pos: usize,
    len: usize,
}

impl<'a> Range<'a> {
    /// Create a span over `lines[line][pos .. pos + len]`.
    pub fn new(lines: &'a [Line], line: usize, pos: usize, len: usize) -> Self {
        debug_assert!(pos + len <= lines[line].len());
        Self {
            lines,
            line,
            pos,
            len,
        }
    }

    /// Index of the line the span lies on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Offset of the span within its line.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of characters in the span.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The text of the span.
    pub fn text(&self) -> String {
        self.chars().iter().map(|c| c.ch).collect()
    }

    /// Bounding rectangle of the span: the union of each character's
    /// rectangle. An empty span yields an empty rectangle.
    pub fn rect(&self) -> RectF {
        self.chars()
            .iter()
            .fold(RectF::default(), |acc, c| acc.united(&c.rect))
    }

    fn chars(&self) -> &'a [Character] {
        &self.lines[self.line].chars()[self.pos..self.pos + self.len]
    }
}

/// A candidate span scored against a matcher box's expected text.
/// Search-local: scores live here, never on shared template objects.
#[derive(Debug, Clone, Copy)]
pub struct ScoredRange<'a> {
    /// The candidate span.
    pub range: Range<'a>,
    /// Substitution distance to the expected text; lower is better.
    pub distance: f32,
}

/// All spans of `len` characters across every line: a sliding window per
/// line, plus one span covering the entirety of any line shorter than
/// `len`. A zero length yields no spans.
pub fn extract_all_ranges(lines: &[Line], len: usize) -> Vec<Range<'_>> {
    if len == 0 {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    for (line_index, line) in lines.iter().enumerate() {
        if len > line.len() {
            ranges.push(Range::new(lines, line_index, 0, line.len()));
            continue;
        }
        for pos in 0..=line.len() - len {
            ranges.push(Range::new(lines, line_index, pos, len));
        }
    }
    ranges
}
