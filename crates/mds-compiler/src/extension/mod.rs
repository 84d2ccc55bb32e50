//! Syntax extensions.
//!
//! Three extension points run around the base parser:
//!
//! - [`BlockExtension`]: claims fenced line regions before block parsing
//!   (e.g. `:::repo` cards). The region is replaced by a placeholder the base
//!   parser passes through untouched, then swapped for the extension's node
//!   while the tree is built.
//! - [`InlineExtension`]: scans runs of text leaves after the tree is built
//!   and splits them around the nodes it recognizes (e.g. `^^caption^^`).
//! - [`AstTransform`]: rewrites the finished tree (e.g. blockquotes carrying a
//!   `[!NOTE]` marker become alerts).
//!
//! Each kind runs in ascending [`priority`](BlockExtension::priority) order;
//! ties keep registration order.

mod alert;
pub(crate) mod block;
mod caption;
mod fence;
pub(crate) mod inline;
mod repo_card;

pub use alert::{AlertKind, AlertTransform};
pub use caption::CaptionExtension;
pub use repo_card::RepoCardExtension;

pub(crate) use alert::{render_alert, render_blockquote, strip_marker};
pub(crate) use caption::render_caption;
pub(crate) use repo_card::render_repo_card;

use crate::ast::{Ast, NodeKind};

/// Default priority for extensions that do not care about ordering.
pub const DEFAULT_PRIORITY: u16 = 100;

/// Block-level extension delimited by standalone fence lines.
pub trait BlockExtension: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Lower runs first.
    fn priority(&self) -> u16 {
        DEFAULT_PRIORITY
    }

    /// Line content (after trimming) that opens the block.
    fn open_token(&self) -> &'static str;

    /// Line content (after trimming) that closes the block.
    fn close_token(&self) -> &'static str;

    /// Build the node for the lines between the fences.
    fn parse(&self, body: &[&str]) -> NodeKind;
}

/// Successful inline extension match.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineMatch {
    /// Kind of the container node to insert.
    pub kind: NodeKind,
    /// Text of the container's single child.
    pub text: String,
    /// Bytes consumed from the input, delimiters included.
    pub consumed: usize,
}

/// Inline extension triggered by a single character.
pub trait InlineExtension: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> u16 {
        DEFAULT_PRIORITY
    }

    /// Character that makes the scanner call [`parse`](Self::parse).
    fn trigger(&self) -> char;

    /// Try to match at the start of `rest`, which runs from the trigger to
    /// the end of the current line. `None` leaves the trigger as text.
    fn parse(&self, rest: &str) -> Option<InlineMatch>;
}

/// Rewrite pass over a fully built tree.
pub trait AstTransform: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> u16 {
        DEFAULT_PRIORITY
    }

    fn transform(&self, ast: &mut Ast);
}
