use std::io::Write;

use crate::codebook::Codebook;
use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;
use crate::tokenizer::tokenize;

/// Encodes text with a codebook's flat lookup. The output is one ASCII
/// `'0'`/`'1'` byte per bit, with no header or terminator.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'c> {
    codebook: &'c Codebook,
}

impl<'c> Encoder<'c> {
    pub fn new(codebook: &'c Codebook) -> Self {
        Encoder { codebook }
    }

    /// Appends the code of every symbol in `data` to `out`. Fails on the
    /// first symbol the codebook does not contain, leaving `out` partially
    /// written.
    pub fn encode_into(&self, data: &[u8], out: &mut Vec<u8>) -> Result<()> {
        for (index, token) in tokenize(data).enumerate() {
            let path = self
                .codebook
                .get(token)
                .ok_or_else(|| HuffmanError::unknown_symbol(Symbol::new(token), index))?;
            out.extend_from_slice(path.as_bytes());
        }
        Ok(())
    }

    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        self.encode_into(data, &mut out)?;
        Ok(out)
    }

    /// Encodes `data` and writes the bits to `writer`. Nothing is written
    /// unless every symbol is known.
    pub fn encode_to<W: Write>(&self, data: &[u8], writer: &mut W) -> Result<usize> {
        let bits = self.encode(data)?;
        writer.write_all(&bits).map_err(HuffmanError::Io)?;
        Ok(bits.len())
    }
}
