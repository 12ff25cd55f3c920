//! # word_huffman
//!
//! Word-level Huffman coding for text files. Words and the individual space,
//! tab and newline characters between them are the symbols; their codes are
//! kept in a separate, human-readable codebook.
//!
//! ## Quick Start
//!
//! ```rust
//! use word_huffman::{CodecConfig, HuffmanCodec};
//!
//! let text = b"the cat the dog";
//! let codec = HuffmanCodec::build([text.as_slice()], CodecConfig::default())?;
//!
//! // one ASCII '0'/'1' byte per bit
//! let bits = codec.encode(text)?;
//! assert_eq!(bits, b"1001100100111");
//!
//! // the codebook text is all a decoder needs
//! let book = codec.codebook().to_bytes();
//! let loaded = HuffmanCodec::from_codebook_bytes(&book, CodecConfig::default())?;
//! assert_eq!(loaded.decode(&bits)?, text);
//! # Ok::<(), word_huffman::HuffmanError>(())
//! ```

pub mod codebook;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod files;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod min_heap;
pub mod symbol;
pub mod tokenizer;

mod bit_path;

pub use bit_path::BitPath;
pub use codebook::Codebook;
pub use config::CodecConfig;
pub use decoder::DecodeTree;
pub use encoder::Encoder;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::HuffmanCodec;
pub use hufftree::HuffmanTree;
pub use symbol::Symbol;
