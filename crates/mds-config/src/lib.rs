//! Configuration management for mds.
//!
//! Parses `mds.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [paths]
//! content_dir = "content"
//! generated_dir = ".generated"
//!
//! [site]
//! sort_direction = "desc"
//! write_html = false
//! base_url = "https://example.com"
//!
//! [site.theme.code]
//! theme = "InspiredGitHub"
//! line_numbers = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the markdown content directory.
    pub content_dir: Option<PathBuf>,
    /// Override the generated output directory.
    pub generated_dir: Option<PathBuf>,
    /// Override the sort direction (`asc` or `desc`).
    pub sort_direction: Option<String>,
    /// Override static HTML output.
    pub write_html: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mds.toml";

const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_GENERATED_DIR: &str = ".generated";
const HTML_DIR: &str = "html";
const INDEX_FILENAME: &str = "sitemap.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory configuration (relative strings from TOML).
    paths: PathsConfigRaw,
    /// Site generation configuration.
    pub site: SiteConfig,

    /// Resolved directories (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    content_dir: Option<String>,
    generated_dir: Option<String>,
}

/// Resolved directories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Root of the markdown sources.
    pub content_dir: PathBuf,
    /// Output root for the index and static HTML.
    pub generated_dir: PathBuf,
}

impl PathsConfig {
    /// Directory for static HTML files (`<generated>/html`).
    #[must_use]
    pub fn html_dir(&self) -> PathBuf {
        self.generated_dir.join(HTML_DIR)
    }

    /// Site index file (`<generated>/sitemap.json`).
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.generated_dir.join(INDEX_FILENAME)
    }
}

/// Site generation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// `asc` or `desc` by creation date.
    pub sort_direction: String,
    /// Write one HTML file per document next to the index.
    pub write_html: bool,
    /// Public base URL used for sitemap XML.
    pub base_url: Option<String>,
    /// Theme settings.
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sort_direction: "desc".to_owned(),
            write_html: false,
            base_url: None,
            theme: ThemeConfig::default(),
        }
    }
}

/// Theme settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Code block highlighting.
    pub code: CodeThemeConfig,
}

/// Code block highlighting settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodeThemeConfig {
    /// Highlight theme name.
    pub theme: String,
    /// Prefix code lines with line numbers.
    pub line_numbers: bool,
}

impl Default for CodeThemeConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_owned(),
            line_numbers: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mds.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, and the
    /// result is validated again.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.paths_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(generated_dir) = &settings.generated_dir {
            self.paths_resolved.generated_dir.clone_from(generated_dir);
        }
        if let Some(sort_direction) = &settings.sort_direction {
            self.site.sort_direction.clone_from(sort_direction);
        }
        if let Some(write_html) = settings.write_html {
            self.site.write_html = write_html;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.site.sort_direction.as_str(), "asc" | "desc") {
            return Err(ConfigError::Validation(format!(
                "site.sort_direction must be \"asc\" or \"desc\", got {:?}",
                self.site.sort_direction
            )));
        }
        require_non_empty(&self.site.theme.code.theme, "site.theme.code.theme")?;
        if let Some(base_url) = &self.site.base_url {
            require_non_empty(base_url, "site.base_url")?;
            require_http_url(base_url, "site.base_url")?;
        }
        if self.paths_resolved.content_dir == self.paths_resolved.generated_dir {
            return Err(ConfigError::Validation(
                "paths.content_dir and paths.generated_dir must differ".to_owned(),
            ));
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Default config with directories relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            paths: PathsConfigRaw::default(),
            site: SiteConfig::default(),
            paths_resolved: PathsConfig {
                content_dir: base.join(DEFAULT_CONTENT_DIR),
                generated_dir: base.join(DEFAULT_GENERATED_DIR),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Resolve relative directories against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        self.paths_resolved = PathsConfig {
            content_dir: resolve(self.paths.content_dir.as_deref(), DEFAULT_CONTENT_DIR),
            generated_dir: resolve(self.paths.generated_dir.as_deref(), DEFAULT_GENERATED_DIR),
        };
    }
}
