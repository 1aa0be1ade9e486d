//! Builds a [`DocumentTree`] from `pulldown-cmark` events.
//!
//! # Event Flow
//!
//! pulldown-cmark emits a flat stream of `Start(tag)`, leaf events and
//! `End(tag)`. Most tags map to one tree node that is opened on `Start` and
//! closed on `End`. Three tags are different because their content is raw
//! source rather than child nodes:
//!
//! - code blocks: the `Text` events inside become the block's line spans
//! - HTML blocks: the `Html` events inside become the block's line spans
//! - autolinks: the `Text` inside becomes the link text
//!
//! While one of those is open the sink is in a *capture* and emits a single
//! leaf on the matching `End`.
//!
//! ## Tight lists
//!
//! ```markdown
//! - Item 1
//! - Item 2
//! ```
//! Events:
//! 1. `Start(List)`
//! 2. `Start(Item)`
//! 3. `Text("Item 1")` - no paragraph around it
//! 4. `End(Item)`
//! 5. ...
//!
//! Inline content that lands directly inside an item is wrapped in an
//! implicit `TextBlock` node, closed again before the next block-level event
//! or the item's `End`.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};

use super::{MarkdownParser, ParseError};
use crate::tree::{DocumentTree, NodeKind, Span, TreeBuilder};

/// [`MarkdownParser`] backed by `pulldown-cmark` with GitHub-flavoured
/// extensions (tables, strikethrough, task lists).
#[derive(Debug, Clone, Copy)]
pub struct PulldownParser {
    options: Options,
}

impl PulldownParser {
    pub fn new() -> Self {
        Self::with_options(
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
        )
    }

    /// Uses an explicit pulldown-cmark option set.
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for PulldownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser for PulldownParser {
    fn parse(&self, body: &str) -> Result<DocumentTree, ParseError> {
        let mut sink = Sink::new(body);
        for (event, range) in Parser::new_ext(body, self.options).into_offset_iter() {
            sink.push(event, range)?;
        }
        sink.finish()
    }
}

enum Capture {
    Code {
        language: Option<String>,
        lines: Vec<Span>,
    },
    Html {
        lines: Vec<Span>,
    },
    AutoLink {
        label: String,
        text: String,
    },
}

struct Sink<'b> {
    body: &'b str,
    builder: TreeBuilder,
    capture: Option<Capture>,
    /// Consecutive text events not yet written as a node.
    text: Option<String>,
    in_table: bool,
}

impl<'b> Sink<'b> {
    fn new(body: &'b str) -> Self {
        Self {
            body,
            builder: TreeBuilder::new(),
            capture: None,
            text: None,
            in_table: false,
        }
    }

    fn push(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), ParseError> {
        if self.capture.is_some() {
            return self.push_captured(event, range);
        }

        if !matches!(event, Event::Text(_)) {
            self.flush_text();
        }

        match &event {
            Event::Start(tag) if is_inline_tag(tag) => self.enter_inline(),
            Event::Start(_) | Event::Rule | Event::Html(_) => self.leave_text_block(),
            Event::End(TagEnd::Item) => self.leave_text_block(),
            Event::End(_) => {}
            _ => self.enter_inline(),
        }

        match &event {
            Event::Start(Tag::Table(_)) => self.in_table = true,
            Event::End(TagEnd::Table) => self.in_table = false,
            _ => {}
        }

        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(end) => {
                if self.builder.close().is_none() {
                    return Err(ParseError::UnbalancedEnd {
                        found: short_name(&end),
                        offset: range.start,
                    });
                }
            }
            Event::Text(text) => self.text.get_or_insert_with(String::new).push_str(&text),
            Event::Code(_) => {
                let content = code_span_content(self.body, range);
                let segments = if self.in_table {
                    split_table_pipes(self.body, content)
                } else {
                    vec![content]
                };
                self.builder.leaf(NodeKind::CodeSpan { segments });
            }
            Event::InlineHtml(_) | Event::Html(_) => {
                self.builder.leaf(NodeKind::RawHtml {
                    segments: vec![range.into()],
                });
            }
            // Line breaks only separate text; coalescing joins the pieces with a space
            Event::SoftBreak | Event::HardBreak => {}
            Event::Rule => {
                self.builder.leaf(NodeKind::ThematicBreak);
            }
            other => {
                self.builder.leaf(NodeKind::Unrecognized {
                    kind: short_name(&other),
                });
            }
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
            Tag::BlockQuote(_) => NodeKind::Blockquote,
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                };
                self.capture = Some(Capture::Code {
                    language,
                    lines: vec![],
                });
                return;
            }
            Tag::HtmlBlock => {
                self.capture = Some(Capture::Html { lines: vec![] });
                return;
            }
            Tag::List(_) => NodeKind::List,
            Tag::Item => NodeKind::ListItem,
            Tag::Table(_) => NodeKind::Table,
            Tag::TableHead => NodeKind::TableHeader,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis | Tag::Strong => NodeKind::Emphasis,
            Tag::Link {
                link_type: LinkType::Autolink | LinkType::Email,
                dest_url,
                ..
            } => {
                self.capture = Some(Capture::AutoLink {
                    label: dest_url.to_string(),
                    text: String::new(),
                });
                return;
            }
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                destination: dest_url.to_string(),
                title: (!title.is_empty()).then(|| title.to_string()),
            },
            other => {
                log::debug!(
                    "unrecognized construct {} at byte {}",
                    short_name(&other),
                    range.start
                );
                NodeKind::Unrecognized {
                    kind: short_name(&other),
                }
            }
        };
        self.builder.open(kind);
    }

    fn push_captured(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), ParseError> {
        let closes = matches!(
            (&self.capture, &event),
            (Some(Capture::Code { .. }), Event::End(TagEnd::CodeBlock))
                | (Some(Capture::Html { .. }), Event::End(TagEnd::HtmlBlock))
                | (Some(Capture::AutoLink { .. }), Event::End(TagEnd::Link))
        );
        if closes {
            self.end_capture();
            return Ok(());
        }

        match (self.capture.as_mut(), event) {
            (Some(Capture::Code { lines, .. }), Event::Text(_)) => lines.push(range.into()),
            (Some(Capture::Html { lines }), Event::Html(_)) => lines.push(range.into()),
            (Some(Capture::AutoLink { text, .. }), Event::Text(t)) => text.push_str(&t),
            (_, other) => {
                log::debug!(
                    "ignoring {} inside raw content at byte {}",
                    short_name(&other),
                    range.start
                );
            }
        }
        Ok(())
    }

    fn end_capture(&mut self) {
        let kind = match self.capture.take() {
            Some(Capture::Code { language, lines }) => NodeKind::FencedCodeBlock { language, lines },
            Some(Capture::Html { lines }) => NodeKind::HtmlBlock { lines },
            Some(Capture::AutoLink { label, text }) => NodeKind::AutoLink { label, text },
            None => return,
        };
        self.builder.leaf(kind);
    }

    fn flush_text(&mut self) {
        if let Some(content) = self.text.take() {
            self.builder.leaf(NodeKind::Text { content });
        }
    }

    /// Opens an implicit text block when inline content arrives directly
    /// inside a list item.
    fn enter_inline(&mut self) {
        if let Some(current) = self.builder.current()
            && matches!(self.builder.kind(current), NodeKind::ListItem)
        {
            self.builder.open(NodeKind::TextBlock);
        }
    }

    fn leave_text_block(&mut self) {
        if let Some(current) = self.builder.current()
            && matches!(self.builder.kind(current), NodeKind::TextBlock)
        {
            self.builder.close();
        }
    }

    fn finish(mut self) -> Result<DocumentTree, ParseError> {
        self.flush_text();
        let open = self.builder.depth() + usize::from(self.capture.is_some());
        if open > 0 {
            return Err(ParseError::Unclosed { open });
        }
        Ok(self.builder.finish())
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Link { .. }
            | Tag::Image { .. }
    )
}

/// The span of a code span's text, without its backtick fences and the
/// single padding space CommonMark strips from each side.
fn code_span_content(body: &str, range: Range<usize>) -> Span {
    let bytes = body.as_bytes();
    let (mut start, mut end) = (range.start, range.end.min(bytes.len()));

    while start < end && bytes[start] == b'`' {
        start += 1;
    }
    while end > start && bytes[end - 1] == b'`' {
        end -= 1;
    }

    let inner = &bytes[start..end];
    let padded = inner.len() >= 2 && inner[0] == b' ' && inner[inner.len() - 1] == b' ';
    if padded && inner.iter().any(|b| *b != b' ') {
        start += 1;
        end -= 1;
    }
    Span { start, end }
}

/// Splits a code span inside a table cell around each `\|`, leaving out the
/// backslash the table syntax needs but the code text does not contain.
fn split_table_pipes(body: &str, content: Span) -> Vec<Span> {
    let bytes = body.as_bytes();
    let mut segments = vec![];
    let mut start = content.start;
    let mut i = content.start;
    while i + 1 < content.end {
        if bytes[i] == b'\\' && bytes[i + 1] == b'|' {
            if i > start {
                segments.push(Span { start, end: i });
            }
            start = i + 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    if start < content.end || segments.is_empty() {
        segments.push(Span {
            start,
            end: content.end,
        });
    }
    segments
}

/// The variant name of a pulldown-cmark value, without its payload.
fn short_name(value: &impl std::fmt::Debug) -> String {
    let debug = format!("{value:?}");
    debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default()
        .to_string()
}
