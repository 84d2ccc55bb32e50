//! Extensible markdown to HTML compiler.
//!
//! This crate provides a [`Compiler`] that turns markdown into an HTML
//! fragment through a fixed pipeline:
//!
//! 1. Block extensions claim fenced regions (`:::repo` cards).
//! 2. `pulldown-cmark` events are folded into an arena [`Ast`].
//! 3. Inline extensions split text runs (`^^caption^^`).
//! 4. [`AstTransform`]s rewrite the tree (GitHub alerts).
//! 5. The tree is rendered to HTML with `syntect` code highlighting.
//! 6. Raster asset references are rewritten to `.webp`.
//!
//! # Example
//!
//! ```
//! use mds_compiler::{CodeTheme, Compiler};
//!
//! let compiler = Compiler::new(CodeTheme::default());
//! let result = compiler
//!     .compile(b"> [!TIP]\n> Use the arena.\n")
//!     .unwrap();
//! assert!(result.html.contains("github-alert-tip"));
//! ```

mod assets;
mod ast;
mod compiler;
mod error;
pub mod extension;
mod highlight;
mod render;
mod tree;
mod util;

pub use assets::rewrite_asset_paths;
pub use ast::{Ast, NodeId, NodeKind, RepoRef, Slot};
pub use compiler::{CompileResult, Compiler};
pub use error::{CompileError, ValidationError};
pub use extension::{AlertKind, AstTransform, BlockExtension, InlineExtension, InlineMatch};
pub use highlight::{CodeTheme, DEFAULT_THEME};
pub use render::TocEntry;
pub use util::{escape_html, slugify};
