//! GitHub-style alerts.
//!
//! A blockquote whose first paragraph starts with `[!NOTE]`, `[!TIP]`,
//! `[!IMPORTANT]`, `[!WARNING]` or `[!CAUTION]` is rewritten into an
//! [`NodeKind::Alert`] after the tree is built:
//!
//! ```markdown
//! > [!WARNING]
//! > Mind the gap.
//! ```
//!
//! The marker stays in the tree and is stripped when the first paragraph is
//! rendered. Blockquotes without a marker render with a neutral style.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use super::AstTransform;
use crate::ast::{Ast, NodeKind};

static ALERT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[!(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\]").unwrap());

static ALERT_MARKER_WITH_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[!(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\]\s*").unwrap());

/// Alert type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlertKind {
    #[default]
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

struct AlertStyle {
    icon: &'static str,
    title: &'static str,
    background: &'static str,
    title_color: &'static str,
    border: &'static str,
}

impl AlertKind {
    /// Parse the upper-case marker name (`NOTE`, `TIP`, ...).
    #[must_use]
    pub fn from_marker(name: &str) -> Option<Self> {
        match name {
            "NOTE" => Some(Self::Note),
            "TIP" => Some(Self::Tip),
            "IMPORTANT" => Some(Self::Important),
            "WARNING" => Some(Self::Warning),
            "CAUTION" => Some(Self::Caution),
            _ => None,
        }
    }

    /// Lower-case name used in CSS classes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    fn style(self) -> AlertStyle {
        let (icon, title, background, title_color, border) = match self {
            Self::Note => ("ℹ️", "Note", "#ddf4ff", "#0969da", "#54aeff"),
            Self::Tip => ("💡", "Tip", "#d8f5e3", "#1a7f37", "#4ac776"),
            Self::Important => ("⚠️", "Important", "#f0e6ff", "#8250df", "#a371f7"),
            Self::Warning => ("⚡", "Warning", "#fff8e6", "#9a6700", "#d4a72c"),
            Self::Caution => ("🔥", "Caution", "#ffebe9", "#d1242f", "#ff6369"),
        };
        AlertStyle {
            icon,
            title,
            background,
            title_color,
            border,
        }
    }
}

/// Rewrites marked blockquotes into alerts.
///
/// Running it twice is a no-op: alerts are not blockquotes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertTransform;

impl AstTransform for AlertTransform {
    fn name(&self) -> &'static str {
        "alert"
    }

    fn transform(&self, ast: &mut Ast) {
        let matches: Vec<_> = ast
            .walk()
            .into_iter()
            .filter(|slot| matches!(ast.kind(slot.node), NodeKind::Blockquote))
            .filter_map(|slot| {
                let first = *ast.children(slot.node).first()?;
                if !matches!(ast.kind(first), NodeKind::Paragraph) {
                    return None;
                }
                let leading = ast.leading_text(first);
                let captures = ALERT_MARKER.captures(&leading)?;
                Some((slot, AlertKind::from_marker(&captures[1]).unwrap_or_default()))
            })
            .collect();

        // Pre-order reversed: nested quotes are rewritten before the quote
        // holding them moves its children.
        for (slot, kind) in matches.into_iter().rev() {
            let children = ast.take_children(slot.node);
            let alert = ast.alloc(NodeKind::Alert(kind));
            ast.set_children(alert, children);
            ast.replace_at(slot.parent, slot.index, alert);
            tracing::trace!(kind = kind.as_str(), "blockquote rewritten as alert");
        }
    }
}

/// Remove a leading `[!TYPE]` marker and the whitespace after it.
pub(crate) fn strip_marker(text: &str) -> &str {
    ALERT_MARKER_WITH_SPACE
        .find(text)
        .map_or(text, |m| &text[m.end()..])
}

pub(crate) fn render_alert(kind: AlertKind, inner_html: &str, out: &mut String) {
    let AlertStyle {
        icon,
        title,
        background,
        title_color,
        border,
    } = kind.style();
    let _ = write!(
        out,
        concat!(
            r#"<div class="github-alert github-alert-{class}" style="padding: 12px 16px; margin-bottom: 16px; border-left: 4px solid {border}; background-color: {background}; border-radius: 4px;">"#,
            r#"<div style="display: flex; align-items: center; margin-bottom: 8px; font-weight: 600; color: {title_color};">"#,
            r#"<span style="margin-right: 8px;">{icon}</span>{title}</div>"#,
            r#"<div class="github-alert-content" style="color: {title_color};">"#,
            "{inner}</div></div>\n"
        ),
        class = kind.as_str(),
        border = border,
        background = background,
        title_color = title_color,
        icon = icon,
        title = title,
        inner = inner_html,
    );
}

pub(crate) fn render_blockquote(inner_html: &str, out: &mut String) {
    out.push_str(concat!(
        r#"<blockquote style="padding: 12px 16px; margin: 16px 0; border-left: 4px solid #d0d7de; "#,
        r#"background-color: #f6f8fa; border-radius: 4px; color: #57606a;">"#,
        "\n"
    ));
    out.push_str(inner_html);
    out.push_str("</blockquote>\n");
}
