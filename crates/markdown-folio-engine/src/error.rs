use crate::front_matter::{DecodeError, FrontMatterError};
use crate::parsing::ParseError;
use crate::tree::SpanOutOfBounds;

/// Why a single document could not be rendered.
///
/// None of these are retried: they mean either malformed input or a
/// construct the renderer has no rule for.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(#[from] FrontMatterError),
    #[error("could not decode front matter: {0}")]
    MetadataDecode(#[from] DecodeError),
    #[error("could not parse document: {0}")]
    Parse(#[from] ParseError),
    #[error("unsupported node kind `{kind}`")]
    UnsupportedNodeKind { kind: String },
    #[error(transparent)]
    SpanOutOfBounds(#[from] SpanOutOfBounds),
}

/// A [`RenderError`] tagged with the document it happened in.
#[derive(Debug, thiserror::Error)]
#[error("failed to render {document}: {source}")]
pub struct DocumentError {
    pub document: String,
    #[source]
    pub source: RenderError,
}

impl DocumentError {
    pub fn new(document: impl Into<String>, source: impl Into<RenderError>) -> Self {
        Self {
            document: document.into(),
            source: source.into(),
        }
    }
}
