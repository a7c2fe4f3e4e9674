//! Positioned-text model produced by OCR backends.

use serde::{Deserialize, Serialize};

use crate::geometry::RectF;

/// A single recognized glyph with its bounding rectangle in image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// The recognized character value.
    pub ch: char,
    /// Bounding rectangle of the glyph.
    pub rect: RectF,
}

impl Character {
    /// Create a new character.
    pub fn new(ch: char, rect: RectF) -> Self {
        Self { ch, rect }
    }
}

/// One recognized text line: an ordered, left-to-right sequence of
/// characters. Inter-word gaps are materialized as space characters so
/// fixed-width spans can cross word boundaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    chars: Vec<Character>,
}

impl Line {
    /// Create a line from its characters.
    pub fn new(chars: Vec<Character>) -> Self {
        Self { chars }
    }

    /// Number of characters on the line.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when the line has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The characters of the line.
    pub fn chars(&self) -> &[Character] {
        &self.chars
    }

    /// The full text of the line.
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// Bounding rectangle of the whole line.
    pub fn rect(&self) -> RectF {
        self.chars
            .iter()
            .fold(RectF::default(), |acc, c| acc.united(&c.rect))
    }
}
