//! Splits raw text into symbols.
//!
//! Words are maximal runs of bytes other than space, tab and newline. Each of
//! those three bytes is a symbol on its own, so concatenating the symbols of a
//! buffer always reproduces the buffer.

use crate::symbol::is_separator;

/// Lazy iterator over the symbols of a byte buffer, borrowed from it.
///
/// A clone replays the remaining symbols from the same position.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

pub fn tokenize(data: &[u8]) -> Tokens<'_> {
    Tokens { data, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let data: &'a [u8] = self.data;
        let rest = &data[self.pos..];
        let first = *rest.first()?;

        let len = if is_separator(first) {
            1
        } else {
            rest.iter().position(|&b| is_separator(b)).unwrap_or(rest.len())
        };

        self.pos += len;
        Some(&rest[..len])
    }
}
