//! Error types for airlift operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building an installer page.
///
/// Every variant is terminal for a run: nothing is retried, and the output
/// file is never touched once one of these is raised.
#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid file argument {0:?}: expected NAME=PATH")]
    InvalidFileArg(String),
}

impl Error {
    /// The path this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Error::MissingFile { path }
            | Error::Read { path, .. }
            | Error::Decode { path, .. }
            | Error::Write { path, .. }
            | Error::Config { path, .. } => Some(path),
            Error::Serialize(_) | Error::InvalidFileArg(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
