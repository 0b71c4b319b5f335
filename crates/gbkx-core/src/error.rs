//! Error types for gbkx-core

use crate::extract::Diagnostics;
use std::path::PathBuf;
use thiserror::Error;

/// Core error types for the gbkx library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive to extract does not exist
    #[error("Archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    /// No 7-Zip executable could be located
    #[error("7-Zip executable not found")]
    ArchiverNotFound,

    /// The archiver process could not be started
    #[error("Failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archiver ran but every invocation shape reported failure
    #[error("All extraction attempts failed\n{0}")]
    ExtractionFailed(Box<Diagnostics>),

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
