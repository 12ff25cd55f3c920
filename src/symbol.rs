use std::borrow::Borrow;
use std::fmt;

/// An atomic unit of text: either a maximal run of non-whitespace bytes or
/// exactly one space, tab or newline. Compared by exact bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Box<[u8]>);

/// Bytes that split words and form one-byte symbols of their own.
pub fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n')
}

impl Symbol {
    pub fn new(bytes: &[u8]) -> Self {
        Symbol(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True for the one-byte space, tab and newline symbols.
    pub fn is_whitespace(&self) -> bool {
        self.0.len() == 1 && is_separator(self.0[0])
    }
}

impl Borrow<[u8]> for Symbol {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for Symbol {
    fn from(bytes: &[u8]) -> Self {
        Symbol::new(bytes)
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::new(text.as_bytes())
    }
}

impl fmt::Display for Symbol {
    // whitespace symbols print as their Rust escapes so log lines stay on one line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_bytes() {
            b" " => write!(f, "' '"),
            b"\t" => write!(f, "'\\t'"),
            b"\n" => write!(f, "'\\n'"),
            bytes => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
        }
    }
}
