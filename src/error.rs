//! Error types for codebook construction, compression and decompression.

use std::path::PathBuf;

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;

/// Every failure the codec can report. None of them are recoverable
/// mid-operation; the caller decides whether the run continues.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// A buffer could not grow.
    #[error("out of memory: could not reserve {requested} more entries")]
    ResourceExhaustion { requested: usize },

    /// A named file or directory does not exist.
    #[error("no such file or directory: {}", path.display())]
    MissingInput { path: PathBuf },

    /// A symbol or bit sequence has no entry in the loaded codebook.
    #[error("codebook mismatch: {0}")]
    CodebookMismatch(String),

    /// The codebook text could not be parsed or declares conflicting paths.
    #[error("malformed codebook at line {line}: {reason}")]
    MalformedCodebook { line: usize, reason: String },

    /// The compressed stream is not a valid sequence of codes.
    #[error("corrupt stream at byte {offset}: {reason}")]
    CorruptStream { offset: usize, reason: String },

    /// The inputs of a build run contained no symbols.
    #[error("no symbols found in the input files")]
    EmptyInput,

    /// Contradictory or incomplete options.
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    /// The encoder met a symbol the codebook does not know.
    pub fn unknown_symbol(symbol: impl std::fmt::Display, index: usize) -> Self {
        HuffmanError::CodebookMismatch(format!("symbol {} (token #{}) is not in the codebook", symbol, index))
    }

    /// The decoder tried to follow a branch the codebook never defined.
    pub fn dead_branch(bit: u8, offset: usize) -> Self {
        HuffmanError::CodebookMismatch(format!(
            "bit '{}' at byte {} leads to no codebook entry",
            bit as char, offset
        ))
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        HuffmanError::MalformedCodebook { line, reason: reason.into() }
    }

    pub fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        HuffmanError::CorruptStream { offset, reason: reason.into() }
    }
}

impl From<HeapErr> for HuffmanError {
    fn from(e: HeapErr) -> Self {
        match e {
            HeapErr::Exhausted(requested) => HuffmanError::ResourceExhaustion { requested },
            // the tree builder only pops while two or more nodes remain
            HeapErr::HeapUnderflow => HuffmanError::EmptyInput,
        }
    }
}
