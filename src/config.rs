use crate::codebook::validate_escape;
use crate::error::{HuffmanError, Result};

pub const DEFAULT_SUFFIX: &str = ".hcz";
pub const DEFAULT_CODEBOOK_NAME: &str = "HuffmanCodebook";

/// Settings shared by build, compress and decompress runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Escape marker for new codebooks; `None` picks one that no word collides with.
    pub escape: Option<String>,
    /// Appended to a file's name when it is compressed.
    pub suffix: String,
    /// Where a build run writes its codebook.
    pub codebook_name: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            escape: None,
            suffix: DEFAULT_SUFFIX.to_string(),
            codebook_name: DEFAULT_CODEBOOK_NAME.to_string(),
        }
    }
}

impl CodecConfig {
    pub fn with_escape(mut self, escape: impl Into<String>) -> Self {
        self.escape = Some(escape.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_codebook_name(mut self, name: impl Into<String>) -> Self {
        self.codebook_name = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(escape) = &self.escape {
            validate_escape(escape)?;
        }
        if self.suffix.len() < 2 || !self.suffix.starts_with('.') {
            return Err(HuffmanError::InvalidUsage(format!(
                "suffix {:?} must start with '.' and name an extension",
                self.suffix
            )));
        }
        if self.codebook_name.is_empty() {
            return Err(HuffmanError::InvalidUsage("codebook path must not be empty".into()));
        }
        Ok(())
    }
}
