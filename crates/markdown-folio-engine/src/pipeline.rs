//! Per-document composition: split, decode, parse, render, assemble.

use crate::error::{DocumentError, RenderError};
use crate::front_matter::{self, MetadataDecoder, YamlDecoder};
use crate::page::Page;
use crate::parsing::{MarkdownParser, PulldownParser};
use crate::render::{self, RenderOptions};

/// Renders raw documents into [`Page`]s.
///
/// A pipeline holds no per-document state, so one instance can be shared
/// across threads and used for any number of documents.
#[derive(Debug, Clone)]
pub struct Pipeline<P = PulldownParser, D = YamlDecoder> {
    parser: P,
    decoder: D,
    options: RenderOptions,
}

impl<P: MarkdownParser, D: MetadataDecoder> Pipeline<P, D> {
    pub fn new(parser: P, decoder: D, options: RenderOptions) -> Self {
        Self {
            parser,
            decoder,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders one document, identified by `name` in any error.
    pub fn render(&self, name: &str, raw: &str) -> Result<Page, DocumentError> {
        log::debug!("Rendering {name} ({} bytes)", raw.len());
        self.render_inner(name, raw)
            .map_err(|e| DocumentError::new(name, e))
    }

    fn render_inner(&self, name: &str, raw: &str) -> Result<Page, RenderError> {
        let split = front_matter::split(raw)?;
        let front = match &split.metadata {
            Some(block) => Some(self.decoder.decode(block)?),
            None => None,
        };
        let tree = self.parser.parse(&split.body)?;
        let stream = render::render(&split.body, &tree, &self.options)?;
        Ok(Page::new(front, name, stream))
    }
}

impl Pipeline {
    /// The bundled parser and decoder with the given options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self::new(PulldownParser::new(), YamlDecoder, options)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_options(RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front_matter::{DecodeError, FrontMatter};
    use crate::parsing::ParseError;
    use crate::tree::{DocumentTree, NodeKind, TreeBuilder};
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        Pipeline::default()
    }

    #[test]
    fn document_with_front_matter() {
        let page = pipeline()
            .render("a.md", "---\ntitle: A\n---\nBody")
            .unwrap();

        assert_eq!(
            page.front,
            Some(FrontMatter {
                title: Some("A".into()),
                date: None,
                image: None,
            })
        );
        assert_eq!(page.name, "a.md");
        assert_eq!(page.content, "<p>Body</p>");
    }

    #[test]
    fn document_without_front_matter() {
        let page = pipeline().render("b.md", "# Hi\n\nThere").unwrap();

        assert_eq!(page.front, None);
        assert_eq!(page.content, "<h1>Hi</h1><p>There</p>");
    }

    #[test]
    fn unterminated_front_matter_names_document() {
        let err = pipeline()
            .render("broken.md", "---\ntitle: A\nBody")
            .unwrap_err();

        assert_eq!(err.document, "broken.md");
        assert!(matches!(err.source, RenderError::MalformedFrontMatter(_)));
    }

    #[test]
    fn invalid_yaml_is_a_decode_error() {
        let err = pipeline()
            .render("bad.md", "---\ntitle: [unclosed\n---\nBody")
            .unwrap_err();

        assert!(matches!(err.source, RenderError::MetadataDecode(_)));
    }

    #[test]
    fn unsupported_construct_fails_whole_document() {
        let err = pipeline()
            .render("s.md", "Some ~~struck~~ text")
            .unwrap_err();

        assert!(matches!(
            err.source,
            RenderError::UnsupportedNodeKind { ref kind } if kind == "Strikethrough"
        ));
        assert!(err.to_string().starts_with("failed to render s.md"));
    }

    struct FailingParser;

    impl MarkdownParser for FailingParser {
        fn parse(&self, _body: &str) -> Result<DocumentTree, ParseError> {
            Err(ParseError::Unclosed { open: 1 })
        }
    }

    #[test]
    fn parse_errors_propagate() {
        let pipeline = Pipeline::new(FailingParser, YamlDecoder, RenderOptions::default());
        let err = pipeline.render("x.md", "text").unwrap_err();

        assert!(matches!(
            err.source,
            RenderError::Parse(ParseError::Unclosed { open: 1 })
        ));
    }

    struct CountingDecoder;

    impl MetadataDecoder for CountingDecoder {
        fn decode(&self, block: &str) -> Result<FrontMatter, DecodeError> {
            Ok(FrontMatter {
                title: Some(format!("{} lines", block.lines().count())),
                ..FrontMatter::default()
            })
        }
    }

    struct FixedParser;

    impl MarkdownParser for FixedParser {
        fn parse(&self, body: &str) -> Result<DocumentTree, ParseError> {
            let mut b = TreeBuilder::new();
            b.open(NodeKind::Paragraph);
            b.leaf(NodeKind::Text {
                content: body.to_uppercase(),
            });
            b.close();
            Ok(b.finish())
        }
    }

    #[test]
    fn collaborators_are_swappable() {
        let pipeline = Pipeline::new(FixedParser, CountingDecoder, RenderOptions::default());
        let page = pipeline.render("c.md", "---\na: 1\nb: 2\n---\nbody").unwrap();

        assert_eq!(page.title(), Some("2 lines"));
        assert_eq!(page.content, "<p>BODY</p>");
    }

    #[test]
    fn decoder_not_called_without_metadata_block() {
        let pipeline = Pipeline::new(FixedParser, CountingDecoder, RenderOptions::default());
        let page = pipeline.render("c.md", "body").unwrap();

        assert_eq!(page.front, None);
    }

    #[test]
    fn rendering_is_idempotent() {
        let pipeline = pipeline();
        let raw = "# T\n\n- a\n- b *c*\n\n> q\n";
        let first = pipeline.render("i.md", raw).unwrap();
        let second = pipeline.render("i.md", raw).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn pipeline_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
