//! Syntax highlighting for fenced code blocks.

use std::fmt::Write;
use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::util::escape_html;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Theme used when the configured one is unknown.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

// Common short names mapped onto the bundled theme names.
const THEME_ALIASES: &[(&str, &str)] = &[
    ("github", "InspiredGitHub"),
    ("solarized-dark", "Solarized (dark)"),
    ("solarized-light", "Solarized (light)"),
    ("ocean", "base16-ocean.dark"),
    ("ocean-light", "base16-ocean.light"),
    ("eighties", "base16-eighties.dark"),
    ("mocha", "base16-mocha.dark"),
];

/// Code highlighting settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTheme {
    /// Theme name, either a bundled theme or one of its short aliases.
    pub name: String,
    /// Prefix each line with its number.
    pub line_numbers: bool,
}

impl Default for CodeTheme {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME.to_owned(),
            line_numbers: false,
        }
    }
}

/// Resolved highlighter, cheap to share across threads.
pub(crate) struct Highlighter {
    theme: &'static Theme,
    line_numbers: bool,
    /// Set when the configured theme was unknown and the default was used.
    fallback: Option<String>,
}

impl Highlighter {
    pub(crate) fn new(config: &CodeTheme) -> Self {
        let themes = &*THEMES;
        let resolved = THEME_ALIASES
            .iter()
            .find(|(alias, _)| *alias == config.name)
            .map_or(config.name.as_str(), |(_, name)| name);

        let (theme, fallback) = match themes.themes.get(resolved) {
            Some(theme) => (theme, None),
            None => {
                tracing::warn!(theme = %config.name, fallback = DEFAULT_THEME, "unknown code theme");
                let theme = themes
                    .themes
                    .get(DEFAULT_THEME)
                    .or_else(|| themes.themes.values().next());
                match theme {
                    Some(theme) => (
                        theme,
                        Some(format!(
                            "unknown code theme {:?}, using {DEFAULT_THEME}",
                            config.name
                        )),
                    ),
                    None => return Self::empty(config.line_numbers),
                }
            }
        };

        Self {
            theme,
            line_numbers: config.line_numbers,
            fallback,
        }
    }

    // Only reachable if the bundled theme set is empty.
    fn empty(line_numbers: bool) -> Self {
        static EMPTY: LazyLock<Theme> = LazyLock::new(Theme::default);
        Self {
            theme: &EMPTY,
            line_numbers,
            fallback: Some("no code themes available".to_owned()),
        }
    }

    /// Warning to report when the configured theme was replaced.
    pub(crate) fn fallback_warning(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Render a highlighted `<pre>` block.
    pub(crate) fn render(&self, code: &str, lang: Option<&str>, out: &mut String) {
        let syntax = lang
            .and_then(|token| SYNTAXES.find_syntax_by_token(token))
            .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());

        let background = self
            .theme
            .settings
            .background
            .map(|c| format!(r#" style="background-color:#{:02x}{:02x}{:02x};""#, c.r, c.g, c.b))
            .unwrap_or_default();
        let class = lang
            .map(|lang| format!(r#" class="language-{}""#, escape_html(lang)))
            .unwrap_or_default();

        let _ = write!(out, r#"<pre class="highlight"{background}><code{class}>"#);
        if let Some(body) = self.highlight_lines(code, syntax) {
            out.push_str(&body);
        } else {
            tracing::debug!(lang = lang.unwrap_or(""), "highlighting failed, emitting plain code");
            out.push_str(&self.plain_lines(code));
        }
        out.push_str("</code></pre>\n");
    }

    fn highlight_lines(&self, code: &str, syntax: &SyntaxReference) -> Option<String> {
        let mut highlighter = HighlightLines::new(syntax, self.theme);
        let mut body = String::with_capacity(code.len() * 2);
        for (index, line) in LinesWithEndings::from(code).enumerate() {
            self.line_number(index, &mut body);
            let regions = highlighter.highlight_line(line, &SYNTAXES).ok()?;
            body.push_str(&styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()?);
        }
        Some(body)
    }

    fn plain_lines(&self, code: &str) -> String {
        let mut body = String::with_capacity(code.len());
        for (index, line) in LinesWithEndings::from(code).enumerate() {
            self.line_number(index, &mut body);
            body.push_str(&escape_html(line));
        }
        body
    }

    fn line_number(&self, index: usize, out: &mut String) {
        if self.line_numbers {
            let _ = write!(
                out,
                r#"<span class="line-number" style="user-select: none; margin-right: 0.8em; opacity: 0.5;">{}</span>"#,
                index + 1
            );
        }
    }
}
