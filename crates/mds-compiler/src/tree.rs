//! Folding `pulldown-cmark` events into an [`Ast`].

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::ast::{Ast, NodeId, NodeKind};
use crate::extension::block::placeholder_index;
use crate::util::heading_level_to_num;

/// Base grammar options.
///
/// GitHub blockquote tags are left off on purpose: alerts are recognized by
/// the alert transform, not by the base parser.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Parse `source` and build the tree.
///
/// `blocks` holds the nodes produced by the block extension pass; the
/// placeholder for block `i` under `tag` is replaced by `blocks[i]`.
pub(crate) fn build(source: &str, tag: &str, blocks: Vec<NodeKind>) -> Ast {
    let mut builder = TreeBuilder {
        ast: Ast::new(),
        tag,
        stack: Vec::new(),
        html_block: None,
        blocks: blocks.into_iter().map(Some).collect(),
    };
    for event in Parser::new_ext(source, parser_options()) {
        builder.event(event);
    }
    builder.ast
}

struct TreeBuilder<'t> {
    ast: Ast,
    tag: &'t str,
    stack: Vec<NodeId>,
    /// Raw HTML collected for the block currently open.
    html_block: Option<String>,
    blocks: Vec<Option<NodeKind>>,
}

impl TreeBuilder<'_> {
    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.ast.root())
    }

    fn leaf(&mut self, kind: NodeKind) {
        let parent = self.current();
        self.ast.append(parent, kind);
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::HtmlBlock) => self.html_block = Some(String::new()),
            Event::End(TagEnd::HtmlBlock) => self.finish_html_block(),
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                self.stack.pop();
            }
            Event::Text(text) => self.text(&text),
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.leaf(NodeKind::Code(code.into_string()));
            }
            Event::Html(html) => match self.html_block.as_mut() {
                Some(buffer) => buffer.push_str(&html),
                None => self.leaf(NodeKind::Html(html.into_string())),
            },
            Event::InlineHtml(html) => self.leaf(NodeKind::InlineHtml(html.into_string())),
            Event::FootnoteReference(label) => {
                self.leaf(NodeKind::FootnoteReference(label.into_string()));
            }
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak),
            Event::HardBreak => self.leaf(NodeKind::HardBreak),
            Event::Rule => self.leaf(NodeKind::Rule),
            Event::TaskListMarker(checked) => self.leaf(NodeKind::TaskListMarker(checked)),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading {
                level: heading_level_to_num(level),
            },
            Tag::BlockQuote(_) => NodeKind::Blockquote,
            Tag::CodeBlock(kind) => NodeKind::CodeBlock {
                info: match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.trim().to_owned())
                    }
                    _ => None,
                },
                literal: String::new(),
            },
            Tag::List(start) => NodeKind::List { start },
            Tag::Item => NodeKind::Item,
            Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition(label.into_string()),
            Tag::Table(alignments) => NodeKind::Table { alignments },
            Tag::TableHead => NodeKind::TableHead,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Superscript => NodeKind::Superscript,
            Tag::Subscript => NodeKind::Subscript,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::HtmlBlock
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::MetadataBlock(_) => NodeKind::Fragment,
        };
        let parent = self.current();
        let id = self.ast.append(parent, kind);
        self.stack.push(id);
    }

    fn text(&mut self, text: &str) {
        let current = self.current();
        if let NodeKind::CodeBlock { literal, .. } = self.ast.kind_mut(current) {
            literal.push_str(text);
        } else {
            self.leaf(NodeKind::Text(text.to_owned()));
        }
    }

    fn finish_html_block(&mut self) {
        let html = self.html_block.take().unwrap_or_default();
        let block = placeholder_index(self.tag, &html)
            .and_then(|index| self.blocks.get_mut(index))
            .and_then(Option::take);
        self.leaf(block.unwrap_or(NodeKind::Html(html)));
    }
}
