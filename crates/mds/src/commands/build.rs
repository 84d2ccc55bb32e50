//! `mds build` command implementation.

use std::path::PathBuf;

use clap::Args;
use mds_config::{CliSettings, Config};
use mds_site::{SiteIndexBuilder, SortDirection};

use super::compiler_from_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover mds.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Output directory for the index and HTML files (overrides config).
    #[arg(long)]
    generated_dir: Option<PathBuf>,

    /// Sort direction by creation date: asc or desc (overrides config).
    #[arg(long, value_name = "asc|desc")]
    sort: Option<String>,

    /// Also write one HTML file per document.
    #[arg(long)]
    write_html: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            content_dir: self.content_dir,
            generated_dir: self.generated_dir,
            sort_direction: self.sort,
            write_html: self.write_html.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let sort: SortDirection = config.site.sort_direction.parse()?;
        let paths = &config.paths_resolved;

        output.highlight("Building site index");
        if let Some(config_path) = &config.config_path {
            output.info(&format!("Config: {}", config_path.display()));
        }
        output.info(&format!("Content: {}", paths.content_dir.display()));
        output.info(&format!("Output: {}", paths.generated_dir.display()));

        let mut builder =
            SiteIndexBuilder::new(compiler_from_config(&config), &paths.content_dir).with_sort(sort);
        if config.site.write_html {
            builder = builder.with_html_output(paths.html_dir());
        }

        let report = builder.build()?;
        let index_path = paths.index_path();
        report.index.save(&index_path)?;

        output.warnings(&report.warnings);
        output.success(&format!(
            "Indexed {} document(s) into {}",
            report.index.len(),
            index_path.display()
        ));
        Ok(())
    }
}
