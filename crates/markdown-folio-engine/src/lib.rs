pub mod error;
pub mod front_matter;
pub mod io;
pub mod page;
pub mod parsing;
pub mod pipeline;
pub mod render;
pub mod site;
pub mod template;
pub mod tree;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use error::{DocumentError, RenderError};
pub use front_matter::{FrontMatter, MetadataDecoder, YamlDecoder};
pub use page::{Page, assemble};
pub use parsing::{MarkdownParser, ParseError, PulldownParser};
pub use pipeline::Pipeline;
pub use render::{CodePolicy, HeaderCells, RenderOptions, TagStream, render};
pub use site::{BuildReport, FailurePolicy, SiteBuilder, SiteError};
pub use template::{PageTemplate, TemplateError};
pub use tree::{DocumentTree, NodeId, NodeKind, Span};
