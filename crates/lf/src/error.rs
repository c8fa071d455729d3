//! CLI error types.

use lf_config::ConfigError;
use lf_pipeline::PipelineError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    #[error("{0}")]
    Validation(String),
}
