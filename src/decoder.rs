use std::ptr;

use tracing::debug;

use crate::bit_path::BitPath;
use crate::codebook::{Codebook, CodebookReader};
use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DecodeNode {
    Branch {
        zero: Option<Box<DecodeNode>>,
        one: Option<Box<DecodeNode>>,
    },
    Leaf(Symbol),
}

impl DecodeNode {
    fn empty() -> Self {
        DecodeNode::Branch { zero: None, one: None }
    }
}

/// Code tree rebuilt from codebook lines. Branches are created as paths
/// reach them, so a branch may have a single child.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    root: DecodeNode,
    symbols: usize,
}

impl DecodeTree {
    fn new() -> Self {
        DecodeTree { root: DecodeNode::empty(), symbols: 0 }
    }

    /// Parses codebook text straight into a tree.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut tree = DecodeTree::new();
        for item in CodebookReader::new(data)? {
            let (line, entry) = item?;
            tree.insert(&entry.path, entry.symbol, line)?;
        }
        debug!(symbols = tree.symbols, "loaded decode tree");
        Ok(tree)
    }

    pub fn from_codebook(codebook: &Codebook) -> Result<Self> {
        let mut tree = DecodeTree::new();
        for entry in codebook.entries() {
            tree.insert(&entry.path, entry.symbol.clone(), 0)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, path: &BitPath, symbol: Symbol, line: usize) -> Result<()> {
        let mut node = &mut self.root;
        for bit in path.bits() {
            node = match node {
                DecodeNode::Leaf(existing) => {
                    return Err(HuffmanError::malformed(
                        line,
                        format!("path {} runs through the code of {}", path, existing),
                    ))
                }
                DecodeNode::Branch { zero, one } => {
                    let slot = if bit { one } else { zero };
                    slot.get_or_insert_with(|| Box::new(DecodeNode::empty())).as_mut()
                }
            };
        }

        match node {
            DecodeNode::Branch { zero: None, one: None } => {
                *node = DecodeNode::Leaf(symbol);
                self.symbols += 1;
                Ok(())
            }
            DecodeNode::Leaf(existing) => Err(HuffmanError::malformed(
                line,
                format!("path {} is already assigned to {}", path, existing),
            )),
            DecodeNode::Branch { .. } => Err(HuffmanError::malformed(
                line,
                format!("path {} is a prefix of another code", path),
            )),
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols
    }

    pub fn decoder(&self) -> Decoder<'_> {
        Decoder {
            root: &self.root,
            current: &self.root,
            offset: 0,
        }
    }

    /// Decodes a whole compressed buffer.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len());
        let mut decoder = self.decoder();
        for &byte in data {
            if let Some(symbol) = decoder.push(byte)? {
                out.extend_from_slice(symbol.as_bytes());
            }
        }
        decoder.finish()?;
        Ok(out)
    }
}

/// Bit-at-a-time walk over a [`DecodeTree`]. Starts at the root, follows one
/// branch per wire byte and returns to the root after each symbol.
#[derive(Debug)]
pub struct Decoder<'t> {
    root: &'t DecodeNode,
    current: &'t DecodeNode,
    offset: usize,
}

impl<'t> Decoder<'t> {
    /// Consumes one wire byte. Returns the symbol completed by it, if any.
    pub fn push(&mut self, byte: u8) -> Result<Option<&'t Symbol>> {
        let offset = self.offset;
        self.offset += 1;

        let bit = match byte {
            b'0' => false,
            b'1' => true,
            other => {
                return Err(HuffmanError::corrupt(
                    offset,
                    format!("expected '0' or '1', found byte 0x{:02x}", other),
                ))
            }
        };

        let child = match self.current {
            DecodeNode::Branch { zero, one } => (if bit { one } else { zero }).as_deref(),
            DecodeNode::Leaf(_) => None,
        };
        match child {
            None => Err(HuffmanError::dead_branch(byte, offset)),
            Some(DecodeNode::Leaf(symbol)) => {
                self.current = self.root;
                Ok(Some(symbol))
            }
            Some(branch) => {
                self.current = branch;
                Ok(None)
            }
        }
    }

    /// True between symbols.
    pub fn at_boundary(&self) -> bool {
        ptr::eq(self.current, self.root)
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Ends the stream; fails if it stopped partway through a code.
    pub fn finish(self) -> Result<()> {
        if self.at_boundary() {
            Ok(())
        } else {
            Err(HuffmanError::corrupt(self.offset, "stream ends in the middle of a code"))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hufftree::HuffmanTree;

    const BOOK: &[u8] = b"$\n111\tdog\n110\tcat\n10\tthe\n0\t$\n\n";

    #[test]
    fn test_decode_scenario() {
        let tree = DecodeTree::parse(BOOK).unwrap();
        assert_eq!(tree.symbol_count(), 4);
        let out = tree.decode(b"1001100100111").unwrap();
        assert_eq!(out, b"the cat the dog".to_vec());
    }

    #[test]
    fn test_empty_stream() {
        let tree = DecodeTree::parse(BOOK).unwrap();
        assert_eq!(tree.decode(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_truncated_stream() {
        let tree = DecodeTree::parse(BOOK).unwrap();
        let err = tree.decode(b"1011").unwrap_err();
        assert!(matches!(err, HuffmanError::CorruptStream { offset: 4, .. }));
    }

    #[test]
    fn test_bad_wire_byte() {
        let tree = DecodeTree::parse(BOOK).unwrap();
        let err = tree.decode(b"10\n").unwrap_err();
        assert!(matches!(err, HuffmanError::CorruptStream { offset: 2, .. }));
    }

    #[test]
    fn test_missing_branch_is_mismatch() {
        let tree = DecodeTree::parse(b"$\n0\ta\n10\tb\n").unwrap();
        assert_eq!(tree.decode(b"010").unwrap(), b"ab".to_vec());
        let err = tree.decode(b"011").unwrap_err();
        assert!(matches!(err, HuffmanError::CodebookMismatch(_)));
    }

    #[test]
    fn test_single_symbol_codebook() {
        let huff = HuffmanTree::try_from("again").unwrap();
        let codebook = Codebook::from_tree(&huff, None).unwrap();
        let tree = DecodeTree::from_codebook(&codebook).unwrap();
        assert_eq!(tree.decode(b"000").unwrap(), b"againagainagain".to_vec());
        assert!(matches!(tree.decode(b"1"), Err(HuffmanError::CodebookMismatch(_))));
    }

    #[test]
    fn test_path_through_leaf_rejected() {
        let err = DecodeTree::parse(b"$\n0\ta\n01\tb\n").unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedCodebook { line: 3, .. }));
    }

    #[test]
    fn test_prefix_of_existing_rejected() {
        let err = DecodeTree::parse(b"$\n01\ta\n0\tb\n").unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedCodebook { line: 3, .. }));
    }

    #[test]
    fn test_same_path_rejected() {
        let err = DecodeTree::parse(b"$\n1\ta\n1\tb\n").unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedCodebook { line: 3, .. }));
    }

    #[test]
    fn test_push_reports_boundaries() {
        let tree = DecodeTree::parse(BOOK).unwrap();
        let mut decoder = tree.decoder();
        assert_eq!(decoder.push(b'1').unwrap(), None);
        assert!(!decoder.at_boundary());
        assert_eq!(decoder.push(b'0').unwrap().map(|s| s.as_bytes()), Some(b"the".as_slice()));
        assert!(decoder.at_boundary());
        assert_eq!(decoder.offset(), 2);
        decoder.finish().unwrap();
    }
}
