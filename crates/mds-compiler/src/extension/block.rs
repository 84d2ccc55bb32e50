//! Block extension pass.
//!
//! Runs over source lines before the base parser sees them. A region claimed
//! by a [`BlockExtension`] is parsed into a node and replaced by an HTML
//! comment placeholder on its own line. `CommonMark` treats that line as an
//! HTML block, so it reaches the tree builder intact and is swapped back for
//! the parsed node there.
//!
//! Regions may sit inside blockquotes and list items. The placeholder keeps
//! the opening line's `>` prefix and indentation so it lands in the same
//! container.

use std::fmt::Write;

use super::BlockExtension;
use super::fence::FenceTracker;
use crate::ast::NodeKind;
use crate::error::CompileError;

const PLACEHOLDER_TAG: &str = "mds-block";

/// Source with claimed regions replaced, plus the nodes they parsed into.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub source: String,
    /// Placeholder tag for this source; never occurs in the input.
    pub tag: String,
    pub nodes: Vec<NodeKind>,
}

/// Apply block extensions to `source`.
///
/// Lines inside fenced code and lines indented as code are never claimed.
pub(crate) fn prepare(
    source: &str,
    extensions: &[Box<dyn BlockExtension>],
) -> Result<Prepared, CompileError> {
    let tag = placeholder_tag(source);
    let mut out = String::with_capacity(source.len());
    let mut nodes = Vec::new();
    let mut fence = FenceTracker::default();
    // Content column of the innermost list item seen so far.
    let mut list_indent = 0;
    let mut lines = source.split_inclusive('\n').enumerate();

    while let Some((index, line)) = lines.next() {
        let (quote, content) = split_quote_prefix(line);
        let item = list_item_width(content);
        let fence_line = match item {
            Some(width) if !fence.in_fence() => &content[width..],
            _ => content,
        };
        if fence.update(fence_line) || fence.in_fence() {
            out.push_str(line);
            continue;
        }

        let blank = content.trim().is_empty();
        let code = !blank && indent_width(content) >= list_indent + 4;
        if let Some(width) = item {
            list_indent = width;
        } else if !blank && indent_width(content) == 0 {
            list_indent = 0;
        }
        if code {
            out.push_str(line);
            continue;
        }

        let trimmed = content.trim();
        let Some(extension) = extensions.iter().find(|e| trimmed == e.open_token()) else {
            out.push_str(line);
            continue;
        };

        let mut body = Vec::new();
        let mut closed = false;
        for (_, inner) in lines.by_ref() {
            let (_, inner) = split_quote_prefix(inner);
            if inner.trim() == extension.close_token() {
                closed = true;
                break;
            }
            body.push(inner.trim_end_matches(['\n', '\r']));
        }
        if !closed {
            return Err(CompileError::UnterminatedBlock {
                token: extension.open_token(),
                line: index + 1,
            });
        }

        tracing::debug!(extension = extension.name(), line = index + 1, "claimed block");
        let indent = &content[..content.len() - content.trim_start().len()];
        let _ = writeln!(out, "{quote}{indent}{}", placeholder(&tag, nodes.len()));
        nodes.push(extension.parse(&body));
    }

    Ok(Prepared {
        source: out,
        tag,
        nodes,
    })
}

/// Split off leading blockquote markers, each with one optional space.
fn split_quote_prefix(line: &str) -> (&str, &str) {
    let mut end = 0;
    while let Some(after) = line[end..].trim_start_matches(' ').strip_prefix('>') {
        end = line.len() - after.len();
        if after.starts_with(' ') {
            end += 1;
        }
    }
    line.split_at(end)
}

/// Byte width of a list item marker with its indentation and spacing, if
/// `line` opens a list item.
fn list_item_width(line: &str) -> Option<usize> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let rest = &line[indent..];
    let marker = if rest.starts_with(['-', '*', '+']) {
        1
    } else {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if !(1..=9).contains(&digits) || !rest[digits..].starts_with(['.', ')']) {
            return None;
        }
        digits + 1
    };
    let after = &rest[marker..];
    let spaces = after.len() - after.trim_start_matches(' ').len();
    if spaces == 0 && !after.trim().is_empty() {
        return None;
    }
    let gap = if spaces > 4 { 1 } else { spaces.max(1) };
    Some((indent + marker + gap).min(line.len()))
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .map_while(|c| match c {
            ' ' => Some(1),
            '\t' => Some(4),
            _ => None,
        })
        .sum()
}

/// A placeholder tag that does not occur in `source`, so author-written
/// comments can never be mistaken for a placeholder.
fn placeholder_tag(source: &str) -> String {
    let mut tag = PLACEHOLDER_TAG.to_owned();
    let mut n = 0;
    while source.contains(&format!("<!--{tag}:")) {
        n += 1;
        tag = format!("{PLACEHOLDER_TAG}-{n}");
    }
    tag
}

pub(crate) fn placeholder(tag: &str, index: usize) -> String {
    format!("<!--{tag}:{index}-->")
}

/// Index encoded in a placeholder HTML block, if `html` is one for `tag`.
pub(crate) fn placeholder_index(tag: &str, html: &str) -> Option<usize> {
    html.trim()
        .strip_prefix("<!--")?
        .strip_prefix(tag)?
        .strip_prefix(':')?
        .strip_suffix("-->")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::extension::RepoCardExtension;

    fn extensions() -> Vec<Box<dyn BlockExtension>> {
        vec![Box::new(RepoCardExtension)]
    }

    #[test]
    fn test_region_replaced_by_placeholder() {
        let prepared = prepare("Intro\n:::repo\nowner/repo\n:::\nOutro\n", &extensions()).unwrap();
        assert_eq!(prepared.source, "Intro\n<!--mds-block:0-->\nOutro\n");
        assert_eq!(prepared.nodes.len(), 1);
    }

    #[test]
    fn test_fenced_code_is_not_claimed() {
        let source = "```\n:::repo\nowner/repo\n:::\n```\n";
        let prepared = prepare(source, &extensions()).unwrap();
        assert_eq!(prepared.source, source);
        assert!(prepared.nodes.is_empty());
    }

    #[test]
    fn test_indented_code_is_not_claimed() {
        let source = "    :::repo\n";
        let prepared = prepare(source, &extensions()).unwrap();
        assert_eq!(prepared.source, source);
    }

    #[test]
    fn test_unterminated_region_is_an_error() {
        let err = prepare("a\n\n:::repo\nowner/repo\n", &extensions()).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnterminatedBlock {
                token: ":::repo",
                line: 3
            }
        );
    }

    #[test]
    fn test_placeholder_index() {
        assert_eq!(placeholder_index("mds-block", &placeholder("mds-block", 7)), Some(7));
        assert_eq!(placeholder_index("mds-block", "<!--mds-block:7-->\n"), Some(7));
        assert_eq!(placeholder_index("mds-block", "<!--mds-block-1:7-->"), None);
        assert_eq!(placeholder_index("mds-block", "<!-- comment -->"), None);
    }

    #[test]
    fn test_placeholder_keeps_list_indentation() {
        let prepared =
            prepare("- item\n\n  :::repo\n  a/b\n  :::\n- next\n", &extensions()).unwrap();
        assert_eq!(
            prepared.source,
            "- item\n\n  <!--mds-block:0-->\n- next\n"
        );
    }

    #[test]
    fn test_region_inside_blockquote() {
        let prepared = prepare("> :::repo\n> a/b\n> :::\n", &extensions()).unwrap();
        assert_eq!(prepared.source, "> <!--mds-block:0-->\n");
        assert_eq!(prepared.nodes.len(), 1);
    }

    #[test]
    fn test_fence_opened_on_list_marker_line() {
        let source = "- ```\n  :::repo\n  ```\n";
        let prepared = prepare(source, &extensions()).unwrap();
        assert_eq!(prepared.source, source);
        assert!(prepared.nodes.is_empty());
    }

    #[test]
    fn test_nested_list_region_is_not_indented_code() {
        let prepared =
            prepare("- a\n  - b\n\n    :::repo\n    a/b\n    :::\n", &extensions()).unwrap();
        assert_eq!(prepared.source, "- a\n  - b\n\n    <!--mds-block:0-->\n");
    }

    #[test]
    fn test_tag_avoids_comments_in_source() {
        let prepared = prepare("<!--mds-block:0-->\n\n:::repo\na/b\n:::\n", &extensions()).unwrap();
        assert_eq!(prepared.tag, "mds-block-1");
        assert_eq!(
            prepared.source,
            "<!--mds-block:0-->\n\n<!--mds-block-1:0-->\n"
        );
    }
}
