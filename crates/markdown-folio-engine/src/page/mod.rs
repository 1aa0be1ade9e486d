//! Final assembly of a rendered document.

use serde::Serialize;

use crate::front_matter::FrontMatter;
use crate::render::TagStream;

/// Everything the templating step needs for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// `None` when the document had no metadata block.
    pub front: Option<FrontMatter>,
    /// Document identifier, the path relative to the source root.
    pub name: String,
    /// The HTML fragment.
    pub content: String,
}

impl Page {
    pub fn new(front: Option<FrontMatter>, name: impl Into<String>, stream: TagStream) -> Self {
        Self {
            front,
            name: name.into(),
            content: assemble(stream),
        }
    }

    /// Title from front matter, if any.
    pub fn title(&self) -> Option<&str> {
        self.front.as_ref()?.title.as_deref()
    }
}

/// Concatenates the stream's fragments in order, with no separators.
pub fn assemble(stream: TagStream) -> String {
    stream.into_fragments().concat()
}
