//! Caption spans: `^^ caption text ^^`.

use super::{InlineExtension, InlineMatch};
use crate::ast::NodeKind;

const DELIMITER: &str = "^^";

const CAPTION_STYLE: &str =
    "display: block; width: 100%; text-align: center; font-style: italic; opacity: 0.8;";

/// Inline extension producing [`NodeKind::Caption`].
///
/// The text between two `^^` pairs on one line is trimmed; a caption with no
/// content is declined and the carets stay literal. Captions do not nest.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaptionExtension;

impl InlineExtension for CaptionExtension {
    fn name(&self) -> &'static str {
        "caption"
    }

    fn trigger(&self) -> char {
        '^'
    }

    fn parse(&self, rest: &str) -> Option<InlineMatch> {
        if rest.len() < 2 * DELIMITER.len() || !rest.starts_with(DELIMITER) {
            return None;
        }
        let inner = &rest[DELIMITER.len()..];
        let close = inner.find(DELIMITER)?;
        let text = inner[..close].trim();
        if text.is_empty() {
            return None;
        }
        Some(InlineMatch {
            kind: NodeKind::Caption,
            text: text.to_owned(),
            consumed: 2 * DELIMITER.len() + close,
        })
    }
}

pub(crate) fn render_caption(inner_html: &str, out: &mut String) {
    out.push_str(r#"<span style=""#);
    out.push_str(CAPTION_STYLE);
    out.push_str(r#"">"#);
    out.push_str(inner_html);
    out.push_str("</span>");
}
