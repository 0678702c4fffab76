use std::path::PathBuf;

use lfsrlab_core::LfsrError;
use thiserror::Error;

/// Errors surfaced by the `lfsrlab` commands.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("register L{index}: {source}")]
    Register {
        index: usize,
        #[source]
        source: LfsrError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    Input(String),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
