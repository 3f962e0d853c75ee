//! Byte/character offset conversion.
//!
//! Regex matches report byte offsets while trait records and highlights use
//! character offsets. `CharOffsets` maps between the two for one text.

use serde::{Deserialize, Serialize};

/// Half-open character span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &TextSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Precomputed character → byte table for one text.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    /// Byte offset of every character plus one trailing entry for the text length.
    char_to_byte: Vec<usize>,
    ascii: bool,
}

impl CharOffsets {
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                char_to_byte: vec![text.len()],
                ascii: true,
            };
        }
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            ascii: false,
        }
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        if self.ascii {
            self.char_to_byte[0]
        } else {
            self.char_to_byte.len() - 1
        }
    }

    /// Byte offset of a character offset, clamped to the text length.
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        if self.ascii {
            return char_idx.min(self.char_to_byte[0]);
        }
        self.char_to_byte
            .get(char_idx)
            .copied()
            .unwrap_or_else(|| self.char_to_byte[self.char_to_byte.len() - 1])
    }

    /// Character offset of a byte offset. Offsets inside a multi-byte
    /// character resolve to that character.
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        if self.ascii {
            return byte_idx.min(self.char_to_byte[0]);
        }
        match self.char_to_byte.binary_search(&byte_idx) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }

    /// Slice `text` by character offsets.
    pub fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> &'a str {
        let start = self.char_to_byte(start);
        let end = self.char_to_byte(end).max(start);
        text.get(start..end).unwrap_or("")
    }
}
