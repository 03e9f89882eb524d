//! CLI error types.

use mtyp_config::ConfigError;
use mtyp_diagrams::ProcessError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Process(#[from] ProcessError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("No file selected")]
    NoFileSelected,
}
