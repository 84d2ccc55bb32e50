//! The compile pipeline.

use crate::assets::rewrite_asset_paths;
use crate::ast::Ast;
use crate::error::CompileError;
use crate::extension::{
    AlertTransform, AstTransform, BlockExtension, CaptionExtension, InlineExtension,
    RepoCardExtension, block, inline,
};
use crate::highlight::{CodeTheme, Highlighter};
use crate::render::{HtmlRenderer, TocEntry};
use crate::tree;

/// Result of compiling one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileResult {
    /// HTML fragment, without `<html>` or `<body>`.
    pub html: String,
    /// Headings in document order.
    pub toc: Vec<TocEntry>,
    /// Non-fatal diagnostics (invalid repository cards, unknown theme).
    pub warnings: Vec<String>,
}

/// Markdown to HTML compiler.
///
/// Holds no per-document state, so one instance can be shared across
/// threads. Compiling the same input twice yields identical output.
///
/// # Example
///
/// ```
/// use mds_compiler::{CodeTheme, Compiler};
///
/// let compiler = Compiler::new(CodeTheme::default());
/// let result = compiler.compile_str("^^A caption^^").unwrap();
/// assert!(result.html.contains("A caption</span>"));
/// ```
pub struct Compiler {
    theme: CodeTheme,
    highlighter: Highlighter,
    block_extensions: Vec<Box<dyn BlockExtension>>,
    inline_extensions: Vec<Box<dyn InlineExtension>>,
    transforms: Vec<Box<dyn AstTransform>>,
}

impl Compiler {
    /// Compiler with repository cards, captions and alerts registered.
    #[must_use]
    pub fn new(theme: CodeTheme) -> Self {
        Self::bare(theme)
            .with_block_extension(RepoCardExtension)
            .with_inline_extension(CaptionExtension)
            .with_transform(AlertTransform)
    }

    /// Compiler with no extensions: plain markdown only.
    #[must_use]
    pub fn bare(theme: CodeTheme) -> Self {
        let highlighter = Highlighter::new(&theme);
        Self {
            theme,
            highlighter,
            block_extensions: Vec::new(),
            inline_extensions: Vec::new(),
            transforms: Vec::new(),
        }
    }

    /// Register a block extension.
    #[must_use]
    pub fn with_block_extension<E: BlockExtension + 'static>(mut self, extension: E) -> Self {
        self.block_extensions.push(Box::new(extension));
        self.block_extensions.sort_by_key(|e| e.priority());
        self
    }

    /// Register an inline extension.
    #[must_use]
    pub fn with_inline_extension<E: InlineExtension + 'static>(mut self, extension: E) -> Self {
        self.inline_extensions.push(Box::new(extension));
        self.inline_extensions.sort_by_key(|e| e.priority());
        self
    }

    /// Register an AST transform.
    #[must_use]
    pub fn with_transform<T: AstTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self.transforms.sort_by_key(|t| t.priority());
        self
    }

    /// Code highlighting settings in use.
    #[must_use]
    pub fn theme(&self) -> &CodeTheme {
        &self.theme
    }

    /// Parse `source` and run every extension and transform, stopping short
    /// of rendering.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnterminatedBlock`] if a block extension fence
    /// is never closed.
    pub fn parse(&self, source: &str) -> Result<Ast, CompileError> {
        let prepared = block::prepare(source, &self.block_extensions)?;
        let mut ast = tree::build(&prepared.source, &prepared.tag, prepared.nodes);
        inline::apply(&mut ast, &self.inline_extensions);
        for transform in &self.transforms {
            tracing::trace!(transform = transform.name(), "running transform");
            transform.transform(&mut ast);
        }
        Ok(ast)
    }

    /// Compile raw document bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidUtf8`] for undecodable input and
    /// [`CompileError::UnterminatedBlock`] for unclosed block extensions.
    pub fn compile(&self, bytes: &[u8]) -> Result<CompileResult, CompileError> {
        let source = std::str::from_utf8(bytes).map_err(|e| CompileError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;
        self.compile_str(source)
    }

    /// Compile a markdown string.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnterminatedBlock`] for unclosed block
    /// extensions.
    pub fn compile_str(&self, source: &str) -> Result<CompileResult, CompileError> {
        let ast = self.parse(source)?;
        let rendered = HtmlRenderer::new(&ast, &self.highlighter).render();

        let mut warnings: Vec<String> = self
            .highlighter
            .fallback_warning()
            .map(str::to_owned)
            .into_iter()
            .collect();
        warnings.extend(rendered.warnings);

        Ok(CompileResult {
            html: rewrite_asset_paths(&rendered.html),
            toc: rendered.toc,
            warnings,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CodeTheme::default())
    }
}
