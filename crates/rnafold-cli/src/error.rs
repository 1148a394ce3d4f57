use cmdrnafold::FoldError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Fold(#[from] FoldError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write output: {0}")]
    Output(String),

    #[error("{failed} of {total} sequences could not be folded")]
    PartialFailure { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
