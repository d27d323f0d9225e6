//! Pure data handed to the presentation layer after each step.

use crate::timing::{orp_index, word_len};

/// One character of a displayed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub is_orp: bool,
}

/// Split a word into glyphs, flagging the optimal recognition point.
pub fn layout_word(word: &str) -> Vec<Glyph> {
    let orp = orp_index(word_len(word));
    word.chars()
        .enumerate()
        .map(|(idx, ch)| Glyph {
            ch,
            is_orp: Some(idx) == orp,
        })
        .collect()
}

/// How to present the current word: its glyphs and the horizontal shift that
/// puts the ORP glyph on the fixation point. Rebuilt on every step and owned
/// by whoever receives it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstruction {
    pub word_index: usize,
    pub characters: Vec<Glyph>,
    pub horizontal_offset: f64,
}

impl RenderInstruction {
    pub fn word(&self) -> String {
        self.characters.iter().map(|g| g.ch).collect()
    }

    pub fn orp_position(&self) -> Option<usize> {
        self.characters.iter().position(|g| g.is_orp)
    }
}

/// Fraction of the sequence already shown, in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Progress(f64);

impl Progress {
    pub const COMPLETE: Progress = Progress(1.0);

    /// An empty sequence counts as fully read.
    pub fn new(position: usize, length: usize) -> Self {
        if length == 0 {
            Self::COMPLETE
        } else {
            Self((position.min(length) as f64) / (length as f64))
        }
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Whole percentage, rounded half up.
    pub fn percent(self) -> u16 {
        (self.0 * 100.0).round() as u16
    }
}
