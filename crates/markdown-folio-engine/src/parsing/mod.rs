//! # Parsing
//!
//! Turning a document body into a [`DocumentTree`] is delegated to a
//! [`MarkdownParser`]. The renderer only relies on this interface; the
//! bundled implementation is [`PulldownParser`].
//!
//! Whatever the implementation, spans stored in the tree must index into the
//! same `body` string that was passed to [`MarkdownParser::parse`].

mod pulldown;

pub use pulldown::PulldownParser;

use crate::tree::DocumentTree;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("end of {found} at byte {offset} does not match any open node")]
    UnbalancedEnd { found: String, offset: usize },
    #[error("{open} node(s) still open at end of input")]
    Unclosed { open: usize },
}

/// Parses a markdown body into a document tree.
pub trait MarkdownParser {
    fn parse(&self, body: &str) -> Result<DocumentTree, ParseError>;
}
