//! Per-kind emission rules.
//!
//! [`emission`] is the whole dispatch table: it says what a node contributes
//! to the tag stream, independent of how the tree is walked.

use std::borrow::Cow;

use html_escape::encode_double_quoted_attribute;

use super::options::{CodePolicy, HeaderCells, RenderOptions};
use crate::error::RenderError;
use crate::tree::{NodeKind, Span};

/// What a node contributes, before its children are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission<'n> {
    /// Push `open`, render the children, push `close`.
    Wrap {
        open: Cow<'static, str>,
        close: Cow<'static, str>,
    },
    /// Trimmed, escaped text added to the pending run.
    Text(&'n str),
    /// Source segments added to the pending run as they are.
    RawSegments(&'n [Span]),
    /// Source lines escaped and pushed as one fragment between `open` and `close`.
    Code {
        open: Cow<'static, str>,
        lines: &'n [Span],
        close: &'static str,
    },
    /// Source lines pushed as one fragment without escaping.
    Verbatim(&'n [Span]),
    /// Nothing of its own; children are still visited.
    Transparent,
}

/// Context that changes how a kind is emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    pub options: RenderOptions,
    /// Set while rendering the descendants of a `TableHeader`.
    pub in_table_header: bool,
}

fn wrap(open: &'static str, close: &'static str) -> Emission<'static> {
    Emission::Wrap {
        open: Cow::Borrowed(open),
        close: Cow::Borrowed(close),
    }
}

/// Looks up the emission rule for `kind`.
///
/// Fails with [`RenderError::UnsupportedNodeKind`] for anything outside the
/// closed set of kinds.
pub fn emission<'n>(kind: &'n NodeKind, ctx: &Context) -> Result<Emission<'n>, RenderError> {
    let emit_code = ctx.options.code == CodePolicy::Emit;

    Ok(match kind {
        NodeKind::Text { content } => Emission::Text(content),
        NodeKind::ThematicBreak | NodeKind::TextBlock => Emission::Transparent,
        NodeKind::Heading { level } => {
            // HTML has no heading outside h1..h6
            let level = (*level).clamp(1, 6);
            Emission::Wrap {
                open: Cow::Owned(format!("<h{level}>")),
                close: Cow::Owned(format!("</h{level}>")),
            }
        }
        NodeKind::Paragraph => wrap("<p>", "</p>"),
        NodeKind::Blockquote => wrap("<blockquote>", "</blockquote>"),
        NodeKind::List => wrap("<ul>", "</ul>"),
        NodeKind::ListItem => wrap("<li>", "</li>"),
        NodeKind::Link { destination, .. } => Emission::Wrap {
            open: Cow::Owned(format!(
                "<a href=\"{}\">",
                encode_double_quoted_attribute(destination)
            )),
            close: Cow::Borrowed("</a>"),
        },
        NodeKind::Emphasis => wrap("<em>", "</em>"),
        NodeKind::Table => wrap("<table>", "</table>"),
        NodeKind::TableHeader => wrap("<thead><tr>", "</tr></thead>"),
        NodeKind::TableRow => wrap("<tr>", "</tr>"),
        NodeKind::TableCell => match (ctx.in_table_header, ctx.options.header_cells) {
            (true, HeaderCells::Th) => wrap("<th>", "</th>"),
            _ => wrap("<td>", "</td>"),
        },
        NodeKind::AutoLink { text, .. } => Emission::Text(text),
        NodeKind::RawHtml { segments } => Emission::RawSegments(segments),
        NodeKind::FencedCodeBlock { language, lines } if emit_code => Emission::Code {
            open: match language {
                Some(lang) => Cow::Owned(format!(
                    "<pre><code class=\"language-{}\">",
                    encode_double_quoted_attribute(lang)
                )),
                None => Cow::Borrowed("<pre><code>"),
            },
            lines,
            close: "</code></pre>",
        },
        NodeKind::CodeSpan { segments } if emit_code => Emission::Code {
            open: Cow::Borrowed("<code>"),
            lines: segments,
            close: "</code>",
        },
        NodeKind::HtmlBlock { lines } if emit_code => Emission::Verbatim(lines),
        NodeKind::FencedCodeBlock { .. } | NodeKind::CodeSpan { .. } | NodeKind::HtmlBlock { .. } => {
            Emission::Transparent
        }
        NodeKind::Unrecognized { kind } => {
            return Err(RenderError::UnsupportedNodeKind { kind: kind.clone() });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx() -> Context {
        Context::default()
    }

    fn tags(kind: &NodeKind, ctx: &Context) -> (String, String) {
        match emission(kind, ctx).unwrap() {
            Emission::Wrap { open, close } => (open.into_owned(), close.into_owned()),
            other => panic!("expected a wrapping emission, got {other:?}"),
        }
    }

    #[rstest]
    #[case(NodeKind::Heading { level: 1 }, "<h1>", "</h1>")]
    #[case(NodeKind::Heading { level: 6 }, "<h6>", "</h6>")]
    #[case(NodeKind::Heading { level: 0 }, "<h1>", "</h1>")]
    #[case(NodeKind::Heading { level: 9 }, "<h6>", "</h6>")]
    #[case(NodeKind::Paragraph, "<p>", "</p>")]
    #[case(NodeKind::Blockquote, "<blockquote>", "</blockquote>")]
    #[case(NodeKind::List, "<ul>", "</ul>")]
    #[case(NodeKind::ListItem, "<li>", "</li>")]
    #[case(NodeKind::Emphasis, "<em>", "</em>")]
    #[case(NodeKind::Table, "<table>", "</table>")]
    #[case(NodeKind::TableHeader, "<thead><tr>", "</tr></thead>")]
    #[case(NodeKind::TableRow, "<tr>", "</tr>")]
    #[case(NodeKind::TableCell, "<td>", "</td>")]
    fn wrapping_kinds(#[case] kind: NodeKind, #[case] open: &str, #[case] close: &str) {
        assert_eq!(tags(&kind, &ctx()), (open.to_string(), close.to_string()));
    }

    #[test]
    fn link_destination_is_attribute_escaped() {
        let kind = NodeKind::Link {
            destination: "/search?q=\"a\"&b".into(),
            title: Some("ignored".into()),
        };
        assert_eq!(
            tags(&kind, &ctx()).0,
            "<a href=\"/search?q=&quot;a&quot;&amp;b\">"
        );
    }

    #[test]
    fn header_cells_follow_option() {
        let mut ctx = Context {
            in_table_header: true,
            ..Context::default()
        };
        assert_eq!(tags(&NodeKind::TableCell, &ctx).0, "<td>");
        ctx.options.header_cells = HeaderCells::Th;
        assert_eq!(tags(&NodeKind::TableCell, &ctx).0, "<th>");
        ctx.in_table_header = false;
        assert_eq!(tags(&NodeKind::TableCell, &ctx).0, "<td>");
    }

    #[test]
    fn autolink_contributes_text_not_label() {
        let kind = NodeKind::AutoLink {
            label: "mailto:a@b.c".into(),
            text: "a@b.c".into(),
        };
        assert_eq!(emission(&kind, &ctx()).unwrap(), Emission::Text("a@b.c"));
    }

    #[rstest]
    #[case(NodeKind::ThematicBreak)]
    #[case(NodeKind::TextBlock)]
    fn transparent_kinds(#[case] kind: NodeKind) {
        assert_eq!(emission(&kind, &ctx()).unwrap(), Emission::Transparent);
    }

    #[test]
    fn code_is_transparent_when_omitted() {
        let ctx = Context {
            options: RenderOptions {
                code: CodePolicy::Omit,
                ..RenderOptions::default()
            },
            ..Context::default()
        };
        for kind in [
            NodeKind::FencedCodeBlock {
                language: None,
                lines: vec![],
            },
            NodeKind::CodeSpan { segments: vec![] },
            NodeKind::HtmlBlock { lines: vec![] },
        ] {
            assert_eq!(emission(&kind, &ctx).unwrap(), Emission::Transparent);
        }
    }

    #[test]
    fn fenced_code_language_class() {
        let kind = NodeKind::FencedCodeBlock {
            language: Some("rust".into()),
            lines: vec![],
        };
        let Emission::Code { open, close, .. } = emission(&kind, &ctx()).unwrap() else {
            panic!("expected code emission");
        };
        assert_eq!(open, "<pre><code class=\"language-rust\">");
        assert_eq!(close, "</code></pre>");
    }

    #[test]
    fn unrecognized_kind_is_an_error() {
        let kind = NodeKind::Unrecognized {
            kind: "Image".into(),
        };
        let err = emission(&kind, &ctx()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedNodeKind { ref kind } if kind == "Image"
        ));
    }
}
