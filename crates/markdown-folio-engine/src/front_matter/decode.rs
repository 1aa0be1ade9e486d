use super::FrontMatter;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Turns a metadata block into a [`FrontMatter`] record.
///
/// Decoding must be deterministic, and a field missing from the block must
/// come back as `None` rather than an error.
pub trait MetadataDecoder {
    fn decode(&self, block: &str) -> Result<FrontMatter, DecodeError>;
}

/// Decodes YAML metadata blocks. Unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl MetadataDecoder for YamlDecoder {
    fn decode(&self, block: &str) -> Result<FrontMatter, DecodeError> {
        // An empty YAML document deserialises as null, not as an empty map
        if block.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        Ok(serde_yaml::from_str(block)?)
    }
}
