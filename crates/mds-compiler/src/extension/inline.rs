//! Inline extension pass.
//!
//! Scans maximal runs of adjacent text leaves, concatenated, so a delimiter
//! split across several leaves by the tokenizer is still seen as one string.

use super::InlineExtension;
use crate::ast::{Ast, NodeId, NodeKind};

/// Run `extensions` over every inline container in the tree.
pub(crate) fn apply(ast: &mut Ast, extensions: &[Box<dyn InlineExtension>]) {
    if extensions.is_empty() {
        return;
    }
    let containers: Vec<NodeId> = ast
        .walk()
        .into_iter()
        .map(|slot| slot.node)
        .filter(|&id| accepts_inline_extensions(ast.kind(id)))
        .collect();
    for id in containers {
        rewrite_text_runs(ast, id, extensions);
    }
}

// Code, alt text and existing extension nodes are left alone.
fn accepts_inline_extensions(kind: &NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::CodeBlock { .. } | NodeKind::Image { .. } | NodeKind::Caption
    )
}

fn rewrite_text_runs(ast: &mut Ast, parent: NodeId, extensions: &[Box<dyn InlineExtension>]) {
    let children = ast.children(parent).to_vec();
    let mut rewritten = Vec::with_capacity(children.len());
    let mut changed = false;
    let mut i = 0;

    while i < children.len() {
        if !matches!(ast.kind(children[i]), NodeKind::Text(_)) {
            rewritten.push(children[i]);
            i += 1;
            continue;
        }
        let start = i;
        let mut run = String::new();
        while let Some(NodeKind::Text(text)) = children.get(i).map(|&id| ast.kind(id)) {
            run.push_str(text);
            i += 1;
        }
        if let Some(nodes) = split_run(ast, &run, extensions) {
            rewritten.extend(nodes);
            changed = true;
        } else {
            rewritten.extend_from_slice(&children[start..i]);
        }
    }

    if changed {
        ast.set_children(parent, rewritten);
    }
}

/// Split `run` into text and extension nodes. `None` if nothing matched.
fn split_run(ast: &mut Ast, run: &str, extensions: &[Box<dyn InlineExtension>]) -> Option<Vec<NodeId>> {
    let mut nodes = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(c) = run[pos..].chars().next() {
        let line_end = run[pos..].find('\n').map_or(run.len(), |n| pos + n);
        let matched = extensions
            .iter()
            .filter(|e| e.trigger() == c)
            .find_map(|e| e.parse(&run[pos..line_end]));

        match matched {
            Some(m) if m.consumed > 0 => {
                if literal_start < pos {
                    nodes.push(ast.alloc(NodeKind::Text(run[literal_start..pos].to_owned())));
                }
                let container = ast.alloc(m.kind);
                let child = ast.alloc(NodeKind::Text(m.text));
                ast.set_children(container, vec![child]);
                nodes.push(container);
                pos += m.consumed;
                literal_start = pos;
            }
            _ => pos += c.len_utf8(),
        }
    }

    if nodes.is_empty() {
        return None;
    }
    if literal_start < run.len() {
        nodes.push(ast.alloc(NodeKind::Text(run[literal_start..].to_owned())));
    }
    Some(nodes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::extension::CaptionExtension;

    fn extensions() -> Vec<Box<dyn InlineExtension>> {
        vec![Box::new(CaptionExtension)]
    }

    fn paragraph(ast: &mut Ast, leaves: &[&str]) -> NodeId {
        let para = ast.append(ast.root(), NodeKind::Paragraph);
        for leaf in leaves {
            ast.append(para, NodeKind::Text((*leaf).to_owned()));
        }
        para
    }

    fn kinds(ast: &Ast, id: NodeId) -> Vec<NodeKind> {
        ast.children(id).iter().map(|&c| ast.kind(c).clone()).collect()
    }

    #[test]
    fn test_caption_split_across_leaves() {
        let mut ast = Ast::new();
        let para = paragraph(&mut ast, &["before ^", "^ cap", "tion ^^ after"]);

        apply(&mut ast, &extensions());

        assert_eq!(
            kinds(&ast, para),
            vec![
                NodeKind::Text("before ".to_owned()),
                NodeKind::Caption,
                NodeKind::Text(" after".to_owned()),
            ]
        );
        let caption = ast.children(para)[1];
        assert_eq!(ast.text_content(caption), "caption");
    }

    #[test]
    fn test_unmatched_run_is_untouched() {
        let mut ast = Ast::new();
        let para = paragraph(&mut ast, &["^^", "^^"]);
        let before = ast.children(para).to_vec();

        apply(&mut ast, &extensions());

        assert_eq!(ast.children(para), before.as_slice());
    }

    #[test]
    fn test_code_blocks_are_skipped() {
        let mut ast = Ast::new();
        let code = ast.append(
            ast.root(),
            NodeKind::CodeBlock {
                info: None,
                literal: String::new(),
            },
        );
        ast.append(code, NodeKind::Text("^^x^^".to_owned()));

        apply(&mut ast, &extensions());

        assert_eq!(kinds(&ast, code), vec![NodeKind::Text("^^x^^".to_owned())]);
    }

    #[test]
    fn test_multibyte_text_around_caption() {
        let mut ast = Ast::new();
        let para = paragraph(&mut ast, &["é ^^ü^^ ß"]);

        apply(&mut ast, &extensions());

        assert_eq!(
            kinds(&ast, para),
            vec![
                NodeKind::Text("é ".to_owned()),
                NodeKind::Caption,
                NodeKind::Text(" ß".to_owned()),
            ]
        );
    }
}
