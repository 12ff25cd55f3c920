//! Textual codebook: the persisted symbol <-> bit path mapping.
//!
//! ```text
//! <escape-marker>\n
//! <path>\t<escaped-symbol>\n
//! ...
//! ```
//!
//! Space, tab and newline symbols cannot appear raw in a line, so they are
//! written as `<m>` followed by a newline byte, `<m>t` and `<m>n`
//! respectively, where `<m>` is the marker from the header. No other bytes
//! are escaped; the marker is chosen so that no word reads as an escape.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use tracing::debug;

use crate::bit_path::BitPath;
use crate::error::{HuffmanError, Result};
use crate::hufftree::HuffmanTree;
use crate::symbol::{is_separator, Symbol};

pub const DEFAULT_ESCAPE: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodebookEntry {
    pub path: BitPath,
    pub symbol: Symbol,
}

/// Flat form of a codebook, used for encoding and for writing the file.
#[derive(Debug, Clone)]
pub struct Codebook {
    escape: String,
    entries: Vec<CodebookEntry>,
    lookup: HashMap<Symbol, usize>,
}

/// True if some word would be read back as an escape sequence (or as a bare
/// marker) under `marker`.
pub fn escape_collides<'a, I>(marker: &str, symbols: I) -> bool
where
    I: IntoIterator<Item = &'a Symbol>,
{
    let m = marker.as_bytes();
    symbols.into_iter().any(|symbol| {
        let bytes = symbol.as_bytes();
        if bytes == m {
            return true;
        }
        bytes.len() == m.len() + 1 && bytes.starts_with(m) && matches!(bytes[m.len()], b'n' | b't')
    })
}

/// The shortest run of `$` that no word collides with.
pub fn choose_escape<'a, I>(symbols: I) -> String
where
    I: IntoIterator<Item = &'a Symbol>,
    I::IntoIter: Clone,
{
    let symbols = symbols.into_iter();
    let mut marker = DEFAULT_ESCAPE.to_string();
    while escape_collides(&marker, symbols.clone()) {
        marker.push_str(DEFAULT_ESCAPE);
    }
    marker
}

/// Rejects markers that could not survive the line format.
pub fn validate_escape(marker: &str) -> Result<()> {
    if marker.is_empty() {
        return Err(HuffmanError::InvalidUsage("escape marker must not be empty".into()));
    }
    if marker.bytes().any(|b| is_separator(b) || b == b'\r') {
        return Err(HuffmanError::InvalidUsage(format!(
            "escape marker {:?} must not contain whitespace",
            marker
        )));
    }
    Ok(())
}

fn escape_symbol(symbol: &Symbol, marker: &[u8], out: &mut Vec<u8>) {
    match symbol.as_bytes() {
        b"\n" => {
            out.extend_from_slice(marker);
            out.push(b'n');
        }
        b" " => {
            out.extend_from_slice(marker);
            out.push(b'\n');
        }
        b"\t" => {
            out.extend_from_slice(marker);
            out.push(b't');
        }
        bytes => out.extend_from_slice(bytes),
    }
}

impl Codebook {
    /// Collects the leaf paths of `tree` under the given escape marker, or
    /// under one chosen from the tree's symbols when `escape` is `None`.
    pub fn from_tree(tree: &HuffmanTree, escape: Option<&str>) -> Result<Self> {
        let paths = tree.paths();
        let escape = match escape {
            Some(marker) => {
                validate_escape(marker)?;
                if escape_collides(marker, paths.iter().map(|(s, _)| *s)) {
                    return Err(HuffmanError::InvalidUsage(format!(
                        "escape marker {:?} collides with a word in the input",
                        marker
                    )));
                }
                marker.to_string()
            }
            None => choose_escape(paths.iter().map(|(s, _)| *s)),
        };
        debug!(escape = %escape, entries = paths.len(), "codebook from tree");

        let entries = paths
            .into_iter()
            .map(|(symbol, path)| (0, CodebookEntry { path, symbol: symbol.clone() }))
            .collect();
        Codebook::from_entries(escape, entries)
    }

    /// Parses a codebook file into its flat form.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let reader = CodebookReader::new(data)?;
        let escape = reader.escape().to_string();
        let entries = reader.collect::<Result<Vec<_>>>()?;
        let codebook = Codebook::from_entries(escape, entries)?;
        debug!(entries = codebook.len(), escape = %codebook.escape, "loaded codebook");
        Ok(codebook)
    }

    /// `items` pairs each entry with the line it was read from, or 0 when
    /// it did not come from a file.
    fn from_entries(escape: String, items: Vec<(usize, CodebookEntry)>) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(items.len());
        let mut paths = HashSet::with_capacity(items.len());
        for (i, (line, entry)) in items.iter().enumerate() {
            if lookup.insert(entry.symbol.clone(), i).is_some() {
                return Err(HuffmanError::malformed(*line, format!("symbol {} listed twice", entry.symbol)));
            }
            if !paths.insert(&entry.path) {
                return Err(HuffmanError::malformed(*line, format!("path {} listed twice", entry.path)));
            }
        }
        let entries = items.into_iter().map(|(_, entry)| entry).collect();
        Ok(Codebook { escape, entries, lookup })
    }

    pub fn escape(&self) -> &str {
        &self.escape
    }

    pub fn get(&self, symbol: &[u8]) -> Option<&BitPath> {
        self.lookup.get(symbol).map(|&i| &self.entries[i].path)
    }

    pub fn entries(&self) -> &[CodebookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shortest and longest code, if there are any entries.
    pub fn min_max_code_length(&self) -> Option<(usize, usize)> {
        let lengths = self.entries.iter().map(|e| e.path.len());
        Some((lengths.clone().min()?, lengths.max()?))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let marker = self.escape.as_bytes();
        let mut out = Vec::with_capacity(marker.len() + 1 + self.entries.len() * 16);
        out.extend_from_slice(marker);
        out.push(b'\n');
        for entry in &self.entries {
            out.extend_from_slice(entry.path.as_bytes());
            out.push(b'\t');
            escape_symbol(&entry.symbol, marker, &mut out);
            out.push(b'\n');
        }
        out
    }
}

/// Streams `(line, entry)` pairs out of codebook text after reading the
/// escape header. `line` is the 1-based line the entry starts on.
#[derive(Debug)]
pub struct CodebookReader<'a> {
    data: &'a [u8],
    escape: String,
    pos: usize,
    line: usize,
    failed: bool,
}

impl<'a> CodebookReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let end = data
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| HuffmanError::malformed(1, "missing escape marker header"))?;
        if end > 0 && data[end - 1] == b'\r' {
            return Err(HuffmanError::malformed(1, "CRLF line endings are not supported"));
        }
        let escape = std::str::from_utf8(&data[..end])
            .map_err(|_| HuffmanError::malformed(1, "escape marker is not valid UTF-8"))?;
        validate_escape(escape).map_err(|_| HuffmanError::malformed(1, format!("bad escape marker {:?}", escape)))?;

        Ok(CodebookReader {
            data,
            escape: escape.to_string(),
            pos: end + 1,
            line: 2,
            failed: false,
        })
    }

    pub fn escape(&self) -> &str {
        &self.escape
    }

    fn read_entry(&mut self) -> Result<CodebookEntry> {
        let line = self.line;
        let rest = &self.data[self.pos..];

        let tab = rest
            .iter()
            .position(|&b| b == b'\t' || b == b'\n')
            .filter(|&i| rest[i] == b'\t')
            .ok_or_else(|| HuffmanError::malformed(line, "expected <path>\\t<symbol>"))?;
        let path = BitPath::parse(&rest[..tab])
            .ok_or_else(|| HuffmanError::malformed(line, "bit path must be a non-empty run of '0' and '1'"))?;

        let field_start = tab + 1;
        let field_len = rest[field_start..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| HuffmanError::malformed(line, "unterminated line"))?;
        let field = &rest[field_start..field_start + field_len];
        let mut consumed = field_start + field_len + 1;
        let mut lines = 1;

        let marker = self.escape.as_bytes();
        let symbol = if field == marker {
            // an escaped space is the marker followed by a raw newline
            if rest.get(consumed) != Some(&b'\n') {
                return Err(HuffmanError::malformed(line, "escaped space is not terminated"));
            }
            consumed += 1;
            lines += 1;
            Symbol::from(" ")
        } else if field.len() == marker.len() + 1 && field.starts_with(marker) && field[marker.len()] == b'n' {
            Symbol::from("\n")
        } else if field.len() == marker.len() + 1 && field.starts_with(marker) && field[marker.len()] == b't' {
            Symbol::from("\t")
        } else if field.is_empty() {
            return Err(HuffmanError::malformed(line, "empty symbol"));
        } else if field.contains(&b'\t') {
            return Err(HuffmanError::malformed(line, "raw tab inside symbol"));
        } else {
            Symbol::new(field)
        };

        self.pos += consumed;
        self.line += lines;
        Ok(CodebookEntry { path, symbol })
    }
}

impl<'a> Iterator for CodebookReader<'a> {
    type Item = Result<(usize, CodebookEntry)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let line = self.line;
        match self.read_entry() {
            Ok(entry) => Some(Ok((line, entry))),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
