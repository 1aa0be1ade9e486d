//! # Rendering
//!
//! Walks a [`DocumentTree`] depth-first and produces a [`TagStream`]: the
//! ordered tag literals and text runs that make up the HTML fragment.
//!
//! ## Walk order
//!
//! For each node in a sibling chain the renderer applies the node's
//! [`Emission`](dispatch::Emission), renders the node's children, and only
//! then moves to the next sibling. Wrapping kinds push their open tag before
//! the children and their close tag after, so tags nest exactly like the tree.
//!
//! ## Text coalescing
//!
//! Text does not go straight into the stream. Trimmed, non-empty fragments
//! collect in a pending run which is joined with single spaces and flushed
//! just before the next tag is pushed (and once more at the end).
//!
//! ## Modules
//!
//! - **`dispatch`**: the per-kind emission table
//! - **`options`**: [`RenderOptions`] for the policy choices

pub mod dispatch;
pub mod options;

pub use options::{CodePolicy, HeaderCells, RenderOptions};

use std::borrow::Cow;

use html_escape::encode_text;

use crate::error::RenderError;
use crate::tree::{DocumentTree, NodeId, NodeKind, Span};
use dispatch::{Context, Emission};

/// Ordered fragments of a rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStream {
    fragments: Vec<String>,
}

impl TagStream {
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<String> {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Renders `tree`, whose spans index into `source`, into a tag stream.
///
/// Any node kind outside the closed set aborts the whole render; no partial
/// stream is returned.
pub fn render(
    source: &str,
    tree: &DocumentTree,
    options: &RenderOptions,
) -> Result<TagStream, RenderError> {
    let mut renderer = TagStackRenderer {
        source,
        tree,
        ctx: Context {
            options: *options,
            in_table_header: false,
        },
        stream: vec![],
        pending: PendingText::default(),
    };
    renderer.walk()?;
    Ok(renderer.finish())
}

/// Text fragments collected since the last tag.
#[derive(Debug, Default)]
struct PendingText(Vec<String>);

impl PendingText {
    fn push(&mut self, fragment: String) {
        if !fragment.is_empty() {
            self.0.push(fragment);
        }
    }

    /// Joins and clears the buffered fragments.
    fn take_run(&mut self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let run = self.0.join(" ");
        self.0.clear();
        Some(run)
    }
}

struct TagStackRenderer<'a> {
    source: &'a str,
    tree: &'a DocumentTree,
    ctx: Context,
    stream: Vec<String>,
    pending: PendingText,
}

/// Pending work on the walk stack.
enum Frame {
    Node { id: NodeId, depth: usize },
    /// Close tag of a wrapping node whose children are done.
    Close(Cow<'static, str>),
    /// Table-header state to restore once a `TableHeader` is done.
    RestoreHeader(bool),
}

impl<'a> TagStackRenderer<'a> {
    /// Walks the tree with an explicit stack so nesting depth is bounded by
    /// the heap rather than the thread stack.
    fn walk(&mut self) -> Result<(), RenderError> {
        let mut stack = vec![];
        self.push_siblings(&mut stack, self.tree.top_level(), 0);

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Node { id, depth } => self.render_node(&mut stack, id, depth)?,
                Frame::Close(close) => self.push_tag(close.into_owned()),
                Frame::RestoreHeader(outer) => self.ctx.in_table_header = outer,
            }
        }
        Ok(())
    }

    /// Queues a sibling chain so that the first sibling is popped first.
    fn push_siblings(&self, stack: &mut Vec<Frame>, first: Option<NodeId>, depth: usize) {
        let chain: Vec<NodeId> = self.tree.siblings(first).collect();
        stack.extend(
            chain
                .into_iter()
                .rev()
                .map(|id| Frame::Node { id, depth }),
        );
    }

    fn render_node(
        &mut self,
        stack: &mut Vec<Frame>,
        id: NodeId,
        depth: usize,
    ) -> Result<(), RenderError> {
        let tree = self.tree;
        let kind = tree.kind(id);
        log::trace!("{:indent$}{}", "", describe(kind), indent = depth * 4);

        match dispatch::emission(kind, &self.ctx)? {
            Emission::Wrap { open, close } => {
                self.push_tag(open.into_owned());
                stack.push(Frame::Close(close));
                if matches!(kind, NodeKind::TableHeader) {
                    stack.push(Frame::RestoreHeader(self.ctx.in_table_header));
                    self.ctx.in_table_header = true;
                }
            }
            Emission::Text(text) => {
                self.pending.push(encode_text(text.trim()).into_owned());
            }
            Emission::RawSegments(segments) => {
                for segment in segments {
                    let raw = segment.resolve(self.source)?;
                    self.pending.push(raw.to_string());
                }
            }
            Emission::Code { open, lines, close } => {
                let code = self.join_lines(lines)?;
                self.push_tag(open.into_owned());
                if !code.is_empty() {
                    self.push_tag(encode_text(&code).into_owned());
                }
                self.push_tag(close.to_string());
            }
            Emission::Verbatim(lines) => {
                let html = self.join_lines(lines)?;
                if !html.is_empty() {
                    self.push_tag(html);
                }
            }
            Emission::Transparent => {}
        }

        // Children sit above the close frame, so they finish before it is popped
        self.push_siblings(stack, tree.first_child(id), depth + 1);
        Ok(())
    }

    /// Flushes pending text as one run, then appends `tag`.
    fn push_tag(&mut self, tag: String) {
        if let Some(run) = self.pending.take_run() {
            self.stream.push(run);
        }
        self.stream.push(tag);
    }

    fn join_lines(&self, lines: &[Span]) -> Result<String, RenderError> {
        let mut out = String::new();
        for line in lines {
            out.push_str(line.resolve(self.source)?);
        }
        Ok(out)
    }

    fn finish(mut self) -> TagStream {
        if let Some(run) = self.pending.take_run() {
            self.stream.push(run);
        }
        TagStream {
            fragments: self.stream,
        }
    }
}

fn describe(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Text { content } => format!("Text: {:?}", content.trim()),
        NodeKind::Heading { level } => format!("Heading {level}"),
        NodeKind::FencedCodeBlock { language, lines } => {
            format!("FencedCodeBlock {language:?} ({} lines)", lines.len())
        }
        NodeKind::Link { destination, title } => format!("Link {destination:?} alt={title:?}"),
        NodeKind::AutoLink { label, text } => format!("AutoLink label={label:?} text={text:?}"),
        other => other.name().to_string(),
    }
}
