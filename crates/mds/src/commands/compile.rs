//! `mds compile` command implementation.

use std::path::PathBuf;

use clap::Args;
use mds_config::Config;

use super::compiler_from_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the compile command.
#[derive(Args)]
pub(crate) struct CompileArgs {
    /// Markdown file to compile.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover mds.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CompileArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let bytes = std::fs::read(&self.file)?;
        let result = compiler_from_config(&config).compile(&bytes)?;

        output.warnings(&result.warnings);
        output.result(&result.html)?;
        Ok(())
    }
}
