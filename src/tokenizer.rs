use std::ops::Deref;

/// Ordered words of a reading session. Built once by [`tokenize`] and never
/// mutated afterwards; no element is empty or contains whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSequence {
    words: Vec<String>,
}

impl WordSequence {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.words.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl Deref for WordSequence {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}

impl<'a> IntoIterator for &'a WordSequence {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

/// Split raw text into display words on runs of whitespace.
///
/// Tokens are kept verbatim: no punctuation stripping and no case folding.
/// Extraction artifacts such as non-breaking spaces, stray line feeds or a
/// zero-width no-break space (U+FEFF) are treated as ordinary whitespace.
pub fn tokenize(text: &str) -> WordSequence {
    WordSequence {
        words: text
            .split(is_separator)
            .filter(|w| !w.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}
