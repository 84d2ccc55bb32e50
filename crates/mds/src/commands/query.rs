//! `mds query` command implementation.

use std::path::PathBuf;

use clap::{ArgGroup, Args};
use mds_config::Config;
use mds_site::SiteIndex;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the query command.
#[derive(Args)]
#[command(group(
    ArgGroup::new("query")
        .required(true)
        .args(["path", "filter", "sitemap_xml"]),
))]
pub(crate) struct QueryArgs {
    /// Path to configuration file (default: auto-discover mds.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site index to query (default: `<generated_dir>/sitemap.json`).
    #[arg(long)]
    index: Option<PathBuf>,

    /// Print the entry with this slug.
    #[arg(long, value_name = "SLUG")]
    path: Option<String>,

    /// Print every entry whose slug matches this regular expression.
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Print a sitemap.xml; the base URL defaults to `site.base_url`.
    #[arg(long, value_name = "BASE_URL", num_args = 0..=1)]
    sitemap_xml: Option<Option<String>>,
}

impl QueryArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let index_path = self
            .index
            .unwrap_or_else(|| config.paths_resolved.index_path());
        let index = SiteIndex::load(&index_path)?;

        let text = if let Some(slug) = self.path {
            serde_json::to_string_pretty(index.lookup(&slug)?)?
        } else if let Some(pattern) = self.filter {
            serde_json::to_string_pretty(&index.filter(&pattern)?)?
        } else {
            let base_url = self
                .sitemap_xml
                .flatten()
                .or(config.site.base_url)
                .ok_or(CliError::MissingBaseUrl)?;
            index.sitemap_xml(&base_url)
        };

        output.result(&text)?;
        Ok(())
    }
}
