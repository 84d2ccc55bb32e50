//! HTML rendering with exhaustive dispatch over [`NodeKind`].

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use pulldown_cmark::Alignment;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::extension::{
    render_alert, render_blockquote, render_caption, render_repo_card, strip_marker,
};
use crate::highlight::Highlighter;
use crate::util::{escape_html, slugify};

const QUOTED_PARAGRAPH: &str = r#"<p style="margin-bottom: 8px;">"#;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor id.
    pub id: String,
}

/// Output of one render pass.
pub(crate) struct Rendered {
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub warnings: Vec<String>,
}

pub(crate) struct HtmlRenderer<'a> {
    ast: &'a Ast,
    highlighter: &'a Highlighter,
    toc: Vec<TocEntry>,
    warnings: Vec<String>,
    id_counts: HashMap<String, usize>,
    used_ids: HashSet<String>,
    footnotes: HashMap<String, usize>,
}

impl<'a> HtmlRenderer<'a> {
    pub(crate) fn new(ast: &'a Ast, highlighter: &'a Highlighter) -> Self {
        Self {
            ast,
            highlighter,
            toc: Vec::new(),
            warnings: Vec::new(),
            id_counts: HashMap::new(),
            used_ids: HashSet::new(),
            footnotes: HashMap::new(),
        }
    }

    pub(crate) fn render(mut self) -> Rendered {
        let mut html = String::with_capacity(4096);
        self.node(self.ast.root(), &mut html);
        Rendered {
            html,
            toc: self.toc,
            warnings: self.warnings,
        }
    }

    fn children(&mut self, id: NodeId, out: &mut String) {
        let ast = self.ast;
        for &child in ast.children(id) {
            self.node(child, out);
        }
    }

    fn wrap(&mut self, id: NodeId, open: &str, close: &str, out: &mut String) {
        out.push_str(open);
        self.children(id, out);
        out.push_str(close);
    }

    #[allow(clippy::too_many_lines)]
    fn node(&mut self, id: NodeId, out: &mut String) {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Document
            | NodeKind::Fragment
            | NodeKind::TableHead
            | NodeKind::TableRow
            | NodeKind::TableCell => self.children(id, out),
            NodeKind::Paragraph => self.wrap(id, "<p>", "</p>\n", out),
            NodeKind::Heading { level } => self.heading(id, *level, out),
            NodeKind::Blockquote => {
                let inner = self.quoted_children(id, false);
                render_blockquote(&inner, out);
            }
            NodeKind::Alert(kind) => {
                let inner = self.quoted_children(id, true);
                render_alert(*kind, &inner, out);
            }
            NodeKind::RepoCard(card) => {
                if let Err(err) = card {
                    tracing::warn!(error = %err, "invalid repository card");
                    self.warnings.push(format!("invalid repository card: {err}"));
                }
                render_repo_card(card, out);
            }
            NodeKind::CodeBlock { info, literal } => {
                let lang = info.as_deref().and_then(|info| info.split_whitespace().next());
                if lang == Some("mermaid") {
                    let _ = writeln!(out, r#"<pre class="mermaid">{}</pre>"#, escape_html(literal));
                } else {
                    self.highlighter.render(literal, lang, out);
                }
            }
            NodeKind::Html(html) | NodeKind::InlineHtml(html) => out.push_str(html),
            NodeKind::List { start } => {
                let (open, close) = match start {
                    None => ("<ul>\n".to_owned(), "</ul>\n"),
                    Some(1) => ("<ol>\n".to_owned(), "</ol>\n"),
                    Some(n) => (format!("<ol start=\"{n}\">\n"), "</ol>\n"),
                };
                self.wrap(id, &open, close, out);
            }
            NodeKind::Item => self.wrap(id, "<li>", "</li>\n", out),
            NodeKind::TaskListMarker(checked) => out.push_str(if *checked {
                r#"<input type="checkbox" checked disabled> "#
            } else {
                r#"<input type="checkbox" disabled> "#
            }),
            NodeKind::Table { alignments } => self.table(id, alignments, out),
            NodeKind::Emphasis => self.wrap(id, "<em>", "</em>", out),
            NodeKind::Strong => self.wrap(id, "<strong>", "</strong>", out),
            NodeKind::Strikethrough => self.wrap(id, "<s>", "</s>", out),
            NodeKind::Superscript => self.wrap(id, "<sup>", "</sup>", out),
            NodeKind::Subscript => self.wrap(id, "<sub>", "</sub>", out),
            NodeKind::Link { url, title } => {
                let open = format!(r#"<a href="{}"{}>"#, escape_html(url), title_attr(title));
                self.wrap(id, &open, "</a>", out);
            }
            NodeKind::Image { url, title } => {
                let _ = write!(
                    out,
                    r#"<img src="{}"{} alt="{}">"#,
                    escape_html(url),
                    title_attr(title),
                    escape_html(&ast.text_content(id))
                );
            }
            NodeKind::Caption => {
                let mut inner = String::new();
                self.children(id, &mut inner);
                render_caption(&inner, out);
            }
            NodeKind::Text(text) => out.push_str(&escape_html(text)),
            NodeKind::Code(code) => {
                let _ = write!(out, "<code>{}</code>", escape_html(code));
            }
            NodeKind::SoftBreak => out.push('\n'),
            NodeKind::HardBreak => out.push_str("<br>\n"),
            NodeKind::Rule => out.push_str("<hr>\n"),
            NodeKind::FootnoteReference(label) => {
                let number = self.footnote_number(label);
                let _ = write!(
                    out,
                    r##"<sup class="footnote-reference"><a href="#{}">{number}</a></sup>"##,
                    escape_html(label)
                );
            }
            NodeKind::FootnoteDefinition(label) => {
                let number = self.footnote_number(label);
                let open = format!(
                    r#"<div class="footnote-definition" id="{}"><sup class="footnote-definition-label">{number}</sup>"#,
                    escape_html(label)
                );
                self.wrap(id, &open, "</div>\n", out);
            }
        }
    }

    fn heading(&mut self, id: NodeId, level: u8, out: &mut String) {
        let title = self.ast.text_content(id).trim().to_owned();
        let anchor = self.unique_id(&title);
        let mut inner = String::new();
        self.children(id, &mut inner);
        let _ = writeln!(out, r#"<h{level} id="{anchor}">{}</h{level}>"#, inner.trim());
        self.toc.push(TocEntry {
            level,
            title,
            id: anchor,
        });
    }

    fn unique_id(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            "section".clone_into(&mut base);
        }
        let mut n = self.id_counts.get(&base).copied().unwrap_or_default();
        let mut id = match n {
            0 => base.clone(),
            n => format!("{base}-{n}"),
        };
        // A literal heading may already own a generated suffix.
        while self.used_ids.contains(&id) {
            n += 1;
            id = format!("{base}-{n}");
        }
        self.id_counts.insert(base, n + 1);
        self.used_ids.insert(id.clone());
        id
    }

    fn footnote_number(&mut self, label: &str) -> usize {
        let next = self.footnotes.len() + 1;
        *self.footnotes.entry(label.to_owned()).or_insert(next)
    }

    /// Children of a blockquote or alert. Direct paragraphs get the quoted
    /// paragraph style; for alerts the first one loses its marker.
    fn quoted_children(&mut self, id: NodeId, strip_first: bool) -> String {
        let ast = self.ast;
        let mut inner = String::new();
        for (index, &child) in ast.children(id).iter().enumerate() {
            if !matches!(ast.kind(child), NodeKind::Paragraph) {
                self.node(child, &mut inner);
            } else if strip_first && index == 0 {
                self.marker_paragraph(child, &mut inner);
            } else {
                self.wrap(child, QUOTED_PARAGRAPH, "</p>\n", &mut inner);
            }
        }
        inner
    }

    /// Render a paragraph with its leading `[!TYPE]` marker removed. The
    /// paragraph is dropped if nothing but the marker remains.
    fn marker_paragraph(&mut self, id: NodeId, out: &mut String) {
        let ast = self.ast;
        let leading = ast.leading_text(id);
        let remainder = strip_marker(&leading);

        let mut rest = &ast.children(id)[ast.leading_text_len(id)..];
        if remainder.is_empty() {
            while let Some((&first, tail)) = rest.split_first() {
                if !matches!(ast.kind(first), NodeKind::SoftBreak | NodeKind::HardBreak) {
                    break;
                }
                rest = tail;
            }
        }

        let mut body = escape_html(remainder);
        for &child in rest {
            self.node(child, &mut body);
        }
        if body.trim().is_empty() {
            return;
        }
        out.push_str(QUOTED_PARAGRAPH);
        out.push_str(&body);
        out.push_str("</p>\n");
    }

    fn table(&mut self, id: NodeId, alignments: &[Alignment], out: &mut String) {
        let ast = self.ast;
        out.push_str("<table>\n");
        for &row in ast.children(id) {
            let head = matches!(ast.kind(row), NodeKind::TableHead);
            let cell_tag = if head { "th" } else { "td" };
            if head {
                out.push_str("<thead>");
            }
            out.push_str("<tr>");
            for (column, &cell) in ast.children(row).iter().enumerate() {
                let open = format!("<{cell_tag}{}>", alignment_style(alignments.get(column)));
                self.wrap(cell, &open, &format!("</{cell_tag}>"), out);
            }
            out.push_str("</tr>");
            if head {
                out.push_str("</thead>\n<tbody>");
            }
            out.push('\n');
        }
        out.push_str("</tbody></table>\n");
    }
}

fn title_attr(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    }
}

fn alignment_style(alignment: Option<&Alignment>) -> &'static str {
    match alignment {
        Some(Alignment::Left) => r#" style="text-align:left""#,
        Some(Alignment::Center) => r#" style="text-align:center""#,
        Some(Alignment::Right) => r#" style="text-align:right""#,
        Some(Alignment::None) | None => "",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::highlight::CodeTheme;
    use crate::tree;

    fn render(markdown: &str) -> Rendered {
        let ast = tree::build(markdown, "mds-block", Vec::new());
        let highlighter = Highlighter::new(&CodeTheme::default());
        HtmlRenderer::new(&ast, &highlighter).render()
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!").html, "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let result = render("## Intro\n\n## Intro\n\n## Intro");
        assert!(result.html.contains(r#"<h2 id="intro">"#));
        assert!(result.html.contains(r#"<h2 id="intro-1">"#));
        assert!(result.html.contains(r#"<h2 id="intro-2">"#));
        assert_eq!(result.toc.len(), 3);
        assert_eq!(result.toc[1].id, "intro-1");
    }

    #[test]
    fn test_heading_id_skips_suffix_taken_by_literal_heading() {
        let result = render("## a\n\n## a\n\n## a-1\n\n## a");
        let ids: Vec<&str> = result.toc.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a-1", "a-1-1", "a-2"]);
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render("# Using `cargo`");
        assert!(result.html.contains(r#"<h1 id="using-cargo">Using <code>cargo</code></h1>"#));
        assert_eq!(result.toc[0].title, "Using cargo");
    }

    #[test]
    fn test_plain_blockquote_is_neutral() {
        let result = render("> plain quote");
        assert!(result.html.starts_with(r#"<blockquote style="padding: 12px 16px;"#));
        assert!(result.html.contains(r#"<p style="margin-bottom: 8px;">plain quote</p>"#));
        assert!(!result.html.contains("github-alert"));
    }

    #[test]
    fn test_table_with_alignment() {
        let result = render("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert!(result.html.contains(r#"<th style="text-align:left">A</th>"#));
        assert!(result.html.contains(r#"<td style="text-align:right">2</td>"#));
        assert!(result.html.contains("</thead>"));
        assert!(result.html.ends_with("</tbody></table>\n"));
    }

    #[test]
    fn test_lists_and_tasks() {
        let result = render("3. three\n4. four\n\n- [x] done\n- [ ] todo");
        assert!(result.html.contains(r#"<ol start="3">"#));
        assert!(result.html.contains(r#"<input type="checkbox" checked disabled> done"#));
        assert!(result.html.contains(r#"<input type="checkbox" disabled> todo"#));
    }

    #[test]
    fn test_link_and_image() {
        let result = render(r#"[site](https://example.com "Ex") ![alt *text*](/a.png)"#);
        assert!(result.html.contains(r#"<a href="https://example.com" title="Ex">site</a>"#));
        assert!(result.html.contains(r#"<img src="/a.png" alt="alt text">"#));
    }

    #[test]
    fn test_mermaid_is_not_highlighted() {
        let result = render("```mermaid\ngraph TD; A-->B\n```");
        assert_eq!(
            result.html,
            "<pre class=\"mermaid\">graph TD; A--&gt;B\n</pre>\n"
        );
    }

    #[test]
    fn test_footnotes_are_numbered_by_first_use() {
        let result = render("A[^b] and B[^a]\n\n[^a]: first\n[^b]: second");
        assert!(result.html.contains(r##"<a href="#b">1</a>"##));
        assert!(result.html.contains(r##"<a href="#a">2</a>"##));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let result = render("<div class=\"x\">raw</div>\n\ninline <kbd>K</kbd>");
        assert!(result.html.contains("<div class=\"x\">raw</div>"));
        assert!(result.html.contains("<kbd>K</kbd>"));
    }
}
