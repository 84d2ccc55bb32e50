//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod compile;
pub(crate) mod query;

pub(crate) use build::BuildArgs;
pub(crate) use compile::CompileArgs;
pub(crate) use query::QueryArgs;

use mds_compiler::{CodeTheme, Compiler};
use mds_config::Config;

/// Compiler configured with the code theme from `config`.
fn compiler_from_config(config: &Config) -> Compiler {
    let code = &config.site.theme.code;
    Compiler::new(CodeTheme {
        name: code.theme.clone(),
        line_numbers: code.line_numbers,
    })
}
