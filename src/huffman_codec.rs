use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codebook::Codebook;
use crate::config::CodecConfig;
use crate::decoder::DecodeTree;
use crate::encoder::Encoder;
use crate::error::{HuffmanError, Result};
use crate::files;
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;

/// Everything one build, compress or decompress run works with: the
/// settings, the flat codebook used for encoding and the tree used for
/// decoding. Runs share no state beyond what is passed in here.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    config: CodecConfig,
    codebook: Codebook,
    tree: DecodeTree,
}

impl HuffmanCodec {
    pub fn new(codebook: Codebook, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let tree = DecodeTree::from_codebook(&codebook)?;
        Ok(HuffmanCodec { config, codebook, tree })
    }

    /// Builds a codebook from the symbol frequencies of `inputs`.
    pub fn build<'a, I>(inputs: I, config: CodecConfig) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        config.validate()?;
        let frequencies: FrequencyTable = inputs.into_iter().collect();
        Self::from_frequencies(frequencies, config)
    }

    /// Builds a codebook from the contents of `paths`, read one at a time in
    /// the given order.
    pub fn build_from_files(paths: &[PathBuf], config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let mut frequencies = FrequencyTable::new();
        for path in paths {
            let data = files::read_file(path)?;
            debug!(path = %path.display(), bytes = data.len(), "counting");
            frequencies.add_bytes(&data);
        }
        info!(files = paths.len(), distinct = frequencies.len(), total = frequencies.total(), "counted symbols");
        Self::from_frequencies(frequencies, config)
    }

    fn from_frequencies(frequencies: FrequencyTable, config: CodecConfig) -> Result<Self> {
        let tree = HuffmanTree::from_frequencies(frequencies)?;
        let codebook = Codebook::from_tree(&tree, config.escape.as_deref())?;
        info!(
            entries = codebook.len(),
            escape = %codebook.escape(),
            code_lengths = ?codebook.min_max_code_length(),
            average_bits = tree.average_code_length(),
            "built codebook"
        );
        Self::new(codebook, config)
    }

    /// Loads a serialized codebook. The flat lookup and the decoding tree
    /// are parsed independently from the same text.
    pub fn from_codebook_bytes(data: &[u8], config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let codebook = Codebook::parse(data)?;
        let tree = DecodeTree::parse(data)?;
        Ok(HuffmanCodec { config, codebook, tree })
    }

    pub fn from_codebook_file(path: &Path, config: CodecConfig) -> Result<Self> {
        let data = files::read_file(path)?;
        let codec = Self::from_codebook_bytes(&data, config)?;
        info!(path = %path.display(), entries = codec.codebook.len(), "loaded codebook");
        Ok(codec)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    pub fn decode_tree(&self) -> &DecodeTree {
        &self.tree
    }

    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        Encoder::new(&self.codebook).encode(data)
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.tree.decode(data)
    }

    pub fn write_codebook(&self, path: &Path) -> Result<()> {
        files::write_file(path, &self.codebook.to_bytes())?;
        info!(path = %path.display(), entries = self.codebook.len(), "wrote codebook");
        Ok(())
    }

    /// Compresses each file to `<file><suffix>`. Files already carrying the
    /// suffix are skipped, unless one is the only input.
    pub fn compress_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let suffix = self.config.suffix.as_str();
        if let [only] = paths {
            if files::has_suffix(only, suffix) {
                return Err(HuffmanError::InvalidUsage(format!(
                    "{} is already compressed",
                    only.display()
                )));
            }
        }

        let mut outputs = Vec::new();
        for path in paths {
            if files::has_suffix(path, suffix) {
                debug!(path = %path.display(), "skipping compressed file");
                continue;
            }
            let data = files::read_file(path)?;
            let bits = self.encode(&data)?;
            let out = files::with_suffix(path, suffix);
            files::write_file(&out, &bits)?;
            info!(input = %path.display(), output = %out.display(), bytes = data.len(), bits = bits.len(), "compressed");
            outputs.push(out);
        }
        Ok(outputs)
    }

    /// Decompresses each `<file><suffix>` back to `<file>`. Files without
    /// the suffix are skipped, unless one is the only input.
    pub fn decompress_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let suffix = self.config.suffix.as_str();
        if let [only] = paths {
            if files::strip_suffix(only, suffix).is_none() {
                return Err(HuffmanError::InvalidUsage(format!(
                    "{} does not end in {}",
                    only.display(),
                    suffix
                )));
            }
        }

        let mut outputs = Vec::new();
        for path in paths {
            let Some(out) = files::strip_suffix(path, suffix) else {
                debug!(path = %path.display(), "skipping uncompressed file");
                continue;
            };
            let bits = files::read_file(path)?;
            let data = self.decode(&bits)?;
            files::write_file(&out, &data)?;
            info!(input = %path.display(), output = %out.display(), bits = bits.len(), bytes = data.len(), "decompressed");
            outputs.push(out);
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let text = b"It was the best of times, it was the worst of times,\n\tit was the age of wisdom.\n";
        let codec = HuffmanCodec::build([text.as_slice()], CodecConfig::default()).unwrap();
        let bits = codec.encode(text).unwrap();
        assert!(bits.iter().all(|&b| b == b'0' || b == b'1'));
        assert_eq!(codec.decode(&bits).unwrap(), text.to_vec());
    }

    #[test]
    fn test_reloaded_codebook_matches() {
        let inputs: [&[u8]; 2] = [b"alpha beta beta\n", b"gamma\talpha  beta"];
        let built = HuffmanCodec::build(inputs, CodecConfig::default()).unwrap();
        let reloaded =
            HuffmanCodec::from_codebook_bytes(&built.codebook().to_bytes(), CodecConfig::default()).unwrap();

        for input in inputs {
            let bits = built.encode(input).unwrap();
            assert_eq!(reloaded.encode(input).unwrap(), bits);
            assert_eq!(reloaded.decode(&bits).unwrap(), input.to_vec());
        }
        assert_eq!(reloaded.decode_tree().symbol_count(), built.codebook().len());
    }

    #[test]
    fn test_build_with_no_symbols() {
        let inputs: [&[u8]; 2] = [b"", b""];
        let err = HuffmanCodec::build(inputs, CodecConfig::default()).unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyInput));
    }

    #[test]
    fn test_configured_escape_is_used() {
        let config = CodecConfig::default().with_escape("%");
        let codec = HuffmanCodec::build([b"a b".as_slice()], config).unwrap();
        assert_eq!(codec.codebook().escape(), "%");
        assert!(codec.codebook().to_bytes().starts_with(b"%\n"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CodecConfig::default().with_suffix("hcz");
        let err = HuffmanCodec::build([b"a".as_slice()], config).unwrap_err();
        assert!(matches!(err, HuffmanError::InvalidUsage(_)));
    }

    #[test]
    fn test_mismatch_against_other_codebook() {
        let codec = HuffmanCodec::build([b"one two".as_slice()], CodecConfig::default()).unwrap();
        assert!(matches!(codec.encode(b"one three"), Err(HuffmanError::CodebookMismatch(_))));
    }
}
